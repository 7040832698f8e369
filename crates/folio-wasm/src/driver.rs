#![forbid(unsafe_code)]

//! Drives a [`Page`] from browser callbacks.
//!
//! The driver owns the page behind a `RefCell`. Every entry point (DOM event,
//! intersection batch, timeout, animation frame) syncs the page clock to
//! `performance.now()`, delivers what it has, then re-arms at most one
//! `setTimeout` and one `requestAnimationFrame`.
//!
//! # Invariants
//!
//! 1. At most one timeout and one animation frame are outstanding.
//! 2. Events that arrive while the page is borrowed are queued, never lost
//!    or delivered re-entrantly.
//! 3. After [`Driver::shutdown`] no callback reaches the page.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use folio_core::PageConfig;
use folio_web::{MountReport, Page, PageError, PageEvent, StorageBackend};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, Window};
use web_time::Instant;

use crate::dom::DomDocument;
use crate::wasm::describe_js_error;

/// Timers running further behind than this (throttled or suspended tab)
/// fire once and resync to the clock instead of replaying the backlog.
const MAX_TIMER_LAG: Duration = Duration::from_millis(250);

pub(crate) struct Driver {
    window: Window,
    started: Instant,
    page: RefCell<Option<Page<DomDocument>>>,
    pending: RefCell<VecDeque<PageEvent<Element>>>,
    timeout: Cell<Option<i32>>,
    frame: Cell<Option<i32>>,
    on_timeout: RefCell<Option<Closure<dyn FnMut()>>>,
    on_frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Driver {
    /// Build the page for `config` and mount it on the current document.
    pub(crate) fn start(
        window: Window,
        config: &PageConfig,
        storage: Box<dyn StorageBackend>,
    ) -> Result<(Rc<Self>, MountReport), PageError> {
        let driver = Rc::new(Self {
            window: window.clone(),
            started: Instant::now(),
            page: RefCell::new(None),
            pending: RefCell::new(VecDeque::new()),
            timeout: Cell::new(None),
            frame: Cell::new(None),
            on_timeout: RefCell::new(None),
            on_frame: RefCell::new(None),
        });

        let doc = DomDocument::new(window, Rc::downgrade(&driver))?;
        let mut page = Page::new(config, doc, storage)?;
        page.set_max_timer_lag(Some(MAX_TIMER_LAG));
        page.set_time(driver.elapsed());
        let report = match page.mount() {
            Ok(report) => report,
            Err(err) => {
                page.doc_mut().detach();
                return Err(err);
            }
        };
        *driver.page.borrow_mut() = Some(page);

        let weak = Rc::downgrade(&driver);
        *driver.on_timeout.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            if let Some(driver) = weak.upgrade() {
                driver.timeout.set(None);
                driver.settle();
            }
        }));
        let weak = Rc::downgrade(&driver);
        *driver.on_frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_ts: f64| {
            if let Some(driver) = weak.upgrade() {
                driver.frame.set(None);
                driver.enqueue(PageEvent::Frame);
                driver.settle();
            }
        }));

        driver.settle();
        Ok((driver, report))
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Queue an event for the next [`Driver::settle`].
    pub(crate) fn enqueue(&self, event: PageEvent<Element>) {
        self.pending.borrow_mut().push_back(event);
    }

    /// Deliver one DOM event now so its default action can still be
    /// prevented.
    pub(crate) fn handle(&self, event: PageEvent<Element>, dom_event: &Event) {
        let Ok(mut guard) = self.page.try_borrow_mut() else {
            self.enqueue(event);
            return;
        };
        let Some(page) = guard.as_mut() else {
            return;
        };
        page.set_time(self.elapsed());
        if page.dispatch(event).default_prevented {
            dom_event.prevent_default();
        }
        drop(guard);
        self.settle();
    }

    /// Deliver queued events and due timers, then re-arm the host callbacks.
    pub(crate) fn settle(&self) {
        let Ok(mut guard) = self.page.try_borrow_mut() else {
            return;
        };
        let Some(page) = guard.as_mut() else {
            return;
        };
        page.set_time(self.elapsed());
        loop {
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            page.push_event(event);
        }
        let result = page.step();
        let delay = page
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(page.now()));
        let wants_frames = result.running && page.wants_frames();
        drop(guard);

        self.arm_timeout(delay);
        if wants_frames {
            self.request_frame();
        }
    }

    fn arm_timeout(&self, delay: Option<Duration>) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(delay) = delay else {
            return;
        };
        let callback = self.on_timeout.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        // Round up so the timeout never fires before the deadline.
        let millis = i32::try_from(delay.as_micros().div_ceil(1000)).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.timeout.set(Some(handle)),
            Err(err) => warn!(error = %describe_js_error(&err), "setTimeout failed"),
        }
    }

    fn request_frame(&self) {
        if self.frame.get().is_some() {
            return;
        }
        let callback = self.on_frame.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame.set(Some(handle)),
            Err(err) => warn!(error = %describe_js_error(&err), "requestAnimationFrame failed"),
        }
    }

    /// Stop the page, release every browser callback and drop the page.
    pub(crate) fn shutdown(&self) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        if let Some(handle) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        self.pending.borrow_mut().clear();

        let Ok(mut guard) = self.page.try_borrow_mut() else {
            warn!("shutdown requested while the page is busy");
            return;
        };
        if let Some(mut page) = guard.take() {
            page.shutdown();
            page.doc_mut().detach();
        }
        drop(guard);
        self.on_timeout.borrow_mut().take();
        self.on_frame.borrow_mut().take();
        debug!("page driver stopped");
    }

    pub(crate) fn is_running(&self) -> bool {
        self.page
            .try_borrow()
            .map(|page| page.as_ref().is_some_and(Page::is_running))
            .unwrap_or(true)
    }
}
