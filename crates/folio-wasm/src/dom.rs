#![forbid(unsafe_code)]

//! [`Document`] over the live DOM.
//!
//! Listener and observer callbacks hold a weak handle to the [`Driver`] and
//! forward into it; dropping the driver turns every callback into a no-op
//! even if the browser still holds it.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Invalid selector | Query returns nothing, logged at debug |
//! | `addEventListener` throws | Listener skipped, logged at warn |
//! | No `IntersectionObserver` | Observation skipped, logged at warn |
//! | Write to a detached node | Ignored |

use std::collections::HashMap;
use std::rc::Weak;

use folio_core::viewport::ObserverOptions;
use folio_web::{
    DomEventKind, Document, ListenTarget, ObserverKey, PageError, PageEvent, ScrollBehavior,
    Surface,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, NodeList, ScrollToOptions, Window,
};

use crate::canvas::CanvasSurface;
use crate::driver::Driver;
use crate::wasm::describe_js_error;

struct Listener {
    target: EventTarget,
    node: Option<Element>,
    kind: DomEventKind,
    callback: Closure<dyn FnMut(Event)>,
}

struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

const fn event_name(kind: DomEventKind) -> &'static str {
    match kind {
        DomEventKind::Click => "click",
        DomEventKind::Scroll => "scroll",
        DomEventKind::Resize => "resize",
    }
}

pub(crate) struct DomDocument {
    window: Window,
    document: web_sys::Document,
    root: Element,
    driver: Weak<Driver>,
    listeners: Vec<Listener>,
    observers: HashMap<ObserverKey, Observer>,
}

impl DomDocument {
    pub(crate) fn new(window: Window, driver: Weak<Driver>) -> Result<Self, PageError> {
        let document = window
            .document()
            .ok_or_else(|| PageError::Host("window has no document".into()))?;
        let root = document
            .document_element()
            .ok_or_else(|| PageError::Host("document has no root element".into()))?;
        Ok(Self {
            window,
            document,
            root,
            driver,
            listeners: Vec::new(),
            observers: HashMap::new(),
        })
    }

    /// Remove every listener and disconnect every observer.
    pub(crate) fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                event_name(listener.kind),
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        for (_, observer) in self.observers.drain() {
            observer.observer.disconnect();
        }
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }

    fn create_observer(
        &self,
        key: ObserverKey,
        options: &ObserverOptions,
    ) -> Result<Observer, JsValue> {
        let driver = self.driver.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let Some(driver) = driver.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    driver.enqueue(PageEvent::Intersection {
                        observer: key,
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    });
                }
                driver.settle();
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Observer {
            observer,
            _callback: callback,
        })
    }
}

fn collect(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
    let list = match list {
        Ok(list) => list,
        Err(err) => {
            debug!(selector, error = %describe_js_error(&err), "selector rejected");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Document for DomDocument {
    type Node = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        collect(self.document.query_selector_all(selector), selector)
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        collect(scope.query_selector_all(selector), selector)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&mut self, node: &Element, class: &str) -> bool {
        node.class_list()
            .toggle(class)
            .unwrap_or_else(|_| node.class_list().contains(class))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(el) = Self::html(node) else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn offset_top(&self, node: &Element) -> f64 {
        Self::html(node).map_or(0.0, |el| f64::from(el.offset_top()))
    }

    fn offset_height(&self, node: &Element) -> f64 {
        Self::html(node).map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn parent_size(&self, node: &Element) -> (f64, f64) {
        match node.parent_element() {
            Some(parent) => match Self::html(&parent) {
                Some(el) => (f64::from(el.offset_width()), f64::from(el.offset_height())),
                None => (
                    f64::from(parent.client_width()),
                    f64::from(parent.client_height()),
                ),
            },
            None => (
                self.window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0),
                self.window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0),
            ),
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn listen(&mut self, target: ListenTarget<'_, Element>, kind: DomEventKind) {
        let node = match target {
            ListenTarget::Window => None,
            ListenTarget::Node(node) => Some(node.clone()),
        };
        if self
            .listeners
            .iter()
            .any(|l| l.kind == kind && l.node == node)
        {
            return;
        }

        let driver = self.driver.clone();
        let clicked = node.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(driver) = driver.upgrade() else {
                return;
            };
            let page_event = match (kind, &clicked) {
                (DomEventKind::Click, Some(node)) => PageEvent::Click(node.clone()),
                (DomEventKind::Click, None) => return,
                (DomEventKind::Scroll, _) => PageEvent::Scroll,
                (DomEventKind::Resize, _) => PageEvent::Resize,
            };
            driver.handle(page_event, &event);
        });

        let target: EventTarget = match &node {
            Some(node) => node.clone().into(),
            None => self.window.clone().into(),
        };
        if let Err(err) = target
            .add_event_listener_with_callback(event_name(kind), callback.as_ref().unchecked_ref())
        {
            warn!(
                event = event_name(kind),
                error = %describe_js_error(&err),
                "listener not attached"
            );
            return;
        }
        self.listeners.push(Listener {
            target,
            node,
            kind,
            callback,
        });
    }

    fn observe(&mut self, key: ObserverKey, options: &ObserverOptions, node: &Element) {
        if !self.observers.contains_key(&key) {
            match self.create_observer(key, options) {
                Ok(observer) => {
                    self.observers.insert(key, observer);
                }
                Err(err) => {
                    warn!(
                        observer = key.as_str(),
                        error = %describe_js_error(&err),
                        "intersection observer unavailable"
                    );
                    return;
                }
            }
        }
        if let Some(observer) = self.observers.get(&key) {
            observer.observer.observe(node);
        }
    }

    fn unobserve(&mut self, key: ObserverKey, node: &Element) {
        if let Some(observer) = self.observers.get(&key) {
            observer.observer.unobserve(node);
        }
    }

    fn disconnect(&mut self, key: ObserverKey) {
        if let Some(observer) = self.observers.remove(&key) {
            observer.observer.disconnect();
        }
    }

    fn surface(&mut self, node: &Element) -> Option<Box<dyn Surface>> {
        let canvas = node.dyn_ref::<HtmlCanvasElement>()?.clone();
        CanvasSurface::new(canvas).map(|surface| Box::new(surface) as Box<dyn Surface>)
    }
}
