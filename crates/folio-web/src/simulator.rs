#![forbid(unsafe_code)]

//! Deterministic page simulator for testing.
//!
//! [`Simulator`] runs a [`Page`] over a [`MemoryDocument`] and plays the part
//! of the browser: scrolling and resizing the window fire scroll/resize
//! events followed by the intersection entries they cause, clicks only reach
//! elements that have a listener, and programmatic scrolls fire a scroll
//! event like a real window would.
//!
//! # Example
//!
//! ```ignore
//! let (mut sim, page) = Simulator::sample(&PageConfig::default())?;
//! sim.mount()?;
//! sim.scroll_to(1200.0);
//! sim.advance(Duration::from_secs(3));
//! assert_eq!(sim.doc().text(page.counters[0]), "150+");
//! ```

use std::time::Duration;

use folio_core::PageConfig;

use crate::component::PageEvent;
use crate::host::{DomEventKind, Document};
use crate::memory::{MemoryDocument, NodeRef, SamplePage, sample_page};
use crate::page::{Dispatch, MountReport, Page, StepResult};
use crate::storage::MemoryStorage;
use crate::PageError;

/// Frame interval used by [`Simulator::frames`].
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct Simulator {
    page: Page<MemoryDocument>,
    storage: MemoryStorage,
}

impl Simulator {
    /// Simulate the standard components on `doc`. `storage` stays shared
    /// with the caller.
    pub fn new(
        config: &PageConfig,
        doc: MemoryDocument,
        storage: MemoryStorage,
    ) -> Result<Self, PageError> {
        let page = Page::new(config, doc, Box::new(storage.clone()))?;
        Ok(Self { page, storage })
    }

    /// Simulate the stock landing page with empty storage.
    pub fn sample(config: &PageConfig) -> Result<(Self, SamplePage), PageError> {
        let (doc, handles) = sample_page();
        Ok((Self::new(config, doc, MemoryStorage::new())?, handles))
    }

    /// Mount the page and deliver the initial intersection entries.
    pub fn mount(&mut self) -> Result<MountReport, PageError> {
        let report = self.page.mount()?;
        self.sync_intersections();
        Ok(report)
    }

    /// User scroll to `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.page.doc_mut().set_scroll_y(y);
        self.after_scroll();
    }

    /// Resize the window.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.page.doc_mut().set_viewport(width, height);
        self.page.dispatch(PageEvent::Resize);
        self.sync_intersections();
    }

    /// Click `node`. Elements without a click listener ignore the click.
    pub fn click(&mut self, node: NodeRef) -> Dispatch {
        if !self.page.doc().is_listening(node, DomEventKind::Click) {
            return Dispatch::default();
        }
        let before = self.page.doc().scroll_y();
        let dispatch = self.page.dispatch(PageEvent::Click(node));
        self.after_programmatic_scroll(before);
        dispatch
    }

    /// Let `dt` pass, firing every timer that comes due.
    pub fn advance(&mut self, dt: Duration) -> StepResult {
        self.page.advance_time(dt);
        self.page.step()
    }

    /// Run `count` animation frames, [`FRAME_INTERVAL`] apart.
    pub fn frames(&mut self, count: u32) -> StepResult {
        let mut last = self.advance(Duration::ZERO);
        for _ in 0..count {
            last = self.frame(FRAME_INTERVAL);
        }
        last
    }

    /// Advance by `dt`, then deliver one animation frame if the page wants
    /// frames.
    pub fn frame(&mut self, dt: Duration) -> StepResult {
        self.page.advance_time(dt);
        let before = self.page.doc().scroll_y();
        if self.page.wants_frames() {
            self.page.push_event(PageEvent::Frame);
        }
        let result = self.page.step();
        self.after_programmatic_scroll(before);
        result
    }

    pub fn shutdown(&mut self) {
        self.page.shutdown();
    }

    fn after_scroll(&mut self) {
        self.page.dispatch(PageEvent::Scroll);
        self.sync_intersections();
    }

    fn after_programmatic_scroll(&mut self, before: f64) {
        if self.page.doc().scroll_y() != before {
            self.after_scroll();
        }
    }

    fn sync_intersections(&mut self) {
        for event in self.page.doc_mut().intersection_events() {
            self.page.dispatch(event);
        }
    }

    // --- accessors ---------------------------------------------------------

    #[must_use]
    pub fn page(&self) -> &Page<MemoryDocument> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page<MemoryDocument> {
        &mut self.page
    }

    #[must_use]
    pub fn doc(&self) -> &MemoryDocument {
        self.page.doc()
    }

    #[must_use]
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.page.now()
    }
}
