#![forbid(unsafe_code)]

//! Browser binding for folio.
//!
//! Exposes one `wasm-bindgen` class, `FolioPage`, that mounts every landing
//! page effect on the live document:
//!
//! ```js
//! import init, { FolioPage } from "./folio_wasm.js";
//! await init();
//! const page = new FolioPage();
//! page.start({ particles: { count: 60 } });
//! // later
//! page.destroy();
//! ```
//!
//! The DOM adapter implements `folio_web::Document` over `web-sys`; timers are
//! collapsed into one `setTimeout` re-armed from the page's next deadline, and
//! the animation frame loop only runs while a component wants frames.

pub mod options;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod driver;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use wasm::FolioPage;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioPage;

#[cfg(not(target_arch = "wasm32"))]
impl FolioPage {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
