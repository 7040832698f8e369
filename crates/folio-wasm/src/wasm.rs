#![forbid(unsafe_code)]

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::driver::Driver;
use crate::options::{parse_options, seed_particles};
use crate::storage::LocalStorage;

/// The landing page effects, mounted on the current document.
#[wasm_bindgen]
pub struct FolioPage {
    driver: Option<Rc<Driver>>,
}

#[wasm_bindgen]
impl FolioPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { driver: None }
    }

    /// Mount every effect.
    ///
    /// `options` is an optional plain object mirroring the page
    /// configuration; omitted fields keep their defaults. Returns the names
    /// of components that were skipped because their elements are missing.
    pub fn start(&mut self, options: Option<JsValue>) -> Result<js_sys::Array, JsValue> {
        if self.driver.is_some() {
            return Err(JsValue::from_str("folio: page already started"));
        }

        let json = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => Some(
                js_sys::JSON::stringify(&value)
                    .map(String::from)
                    .map_err(|err| js_error("options", &err))?,
            ),
            _ => None,
        };
        let mut config = parse_options(json.as_deref()).map_err(|err| error_string(&err))?;
        seed_particles(&mut config, js_sys::Math::random(), js_sys::Math::random());

        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("folio: no window object"))?;
        let storage = Box::new(LocalStorage::new(&window));
        let (driver, report) =
            Driver::start(window, &config, storage).map_err(|err| error_string(&err))?;
        self.driver = Some(driver);

        Ok(report
            .skipped
            .iter()
            .map(|(name, _)| JsValue::from_str(name))
            .collect())
    }

    /// Stop every effect and release all listeners, observers and timers.
    /// Idempotent.
    pub fn destroy(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.shutdown();
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|driver| driver.is_running())
    }
}

impl Default for FolioPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FolioPage {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn error_string(err: &dyn std::error::Error) -> JsValue {
    JsValue::from_str(&format!("folio: {err}"))
}

fn js_error(context: &str, err: &JsValue) -> JsValue {
    JsValue::from_str(&format!("folio: {context}: {}", describe_js_error(err)))
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js_error(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{err:?}")
}
