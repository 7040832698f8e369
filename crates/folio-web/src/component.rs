#![forbid(unsafe_code)]

//! The contract between the page runner and its components.
//!
//! A component declares which events it wants through [`Interest`], mounts
//! once against the document, then reacts to events and its own timers. All
//! side effects go through the [`Context`] it is handed, which scopes timers
//! to the component so the runner can cancel them wholesale.

use std::time::Duration;

use bitflags::bitflags;

use crate::host::{Document, ObserverKey};
use crate::storage::StorageBackend;
use crate::timers::{TimerId, TimerQueue};
use crate::PageError;

bitflags! {
    /// Event classes a component subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        const SCROLL       = 0b0_0001;
        const RESIZE       = 0b0_0010;
        const CLICK        = 0b0_0100;
        const INTERSECTION = 0b0_1000;
        const FRAME        = 0b1_0000;
    }
}

/// An event delivered to components.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<N> {
    /// The window scrolled.
    Scroll,
    /// The window was resized.
    Resize,
    /// A listened-to element was clicked. Carries the element the listener
    /// was registered on, not the innermost click target.
    Click(N),
    /// An observed element crossed its observer's threshold.
    Intersection {
        observer: ObserverKey,
        target: N,
        is_intersecting: bool,
    },
    /// An animation frame is due.
    Frame,
}

impl<N> PageEvent<N> {
    /// The interest a component needs to receive this event.
    #[must_use]
    pub fn interest(&self) -> Interest {
        match self {
            Self::Scroll => Interest::SCROLL,
            Self::Resize => Interest::RESIZE,
            Self::Click(_) => Interest::CLICK,
            Self::Intersection { .. } => Interest::INTERSECTION,
            Self::Frame => Interest::FRAME,
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Side-effect handle passed to every component callback.
pub struct Context<'a, D: Document> {
    /// The document being driven.
    pub doc: &'a mut D,
    storage: &'a dyn StorageBackend,
    timers: &'a mut TimerQueue,
    owner: usize,
    now: Duration,
    default_prevented: bool,
}

impl<'a, D: Document> Context<'a, D> {
    pub(crate) fn new(
        doc: &'a mut D,
        storage: &'a dyn StorageBackend,
        timers: &'a mut TimerQueue,
        owner: usize,
        now: Duration,
    ) -> Self {
        Self {
            doc,
            storage,
            timers,
            owner,
            now,
            default_prevented: false,
        }
    }

    /// Current page time. Inside a timer callback this is the timer's
    /// deadline, so rescheduling from it keeps a steady cadence, unless the
    /// page resynced a timer that fell past its lag limit.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage
    }

    /// Run `on_timer(token)` once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, token: u64) -> TimerId {
        self.timers
            .schedule(self.owner, token, self.now.saturating_add(delay), None)
    }

    /// Run `on_timer(token)` every `period`, first after one period.
    pub fn schedule_every(&mut self, period: Duration, token: u64) -> TimerId {
        self.timers.schedule(
            self.owner,
            token,
            self.now.saturating_add(period),
            Some(period),
        )
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Suppress the host's default action for the current click.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// One independent page behavior.
pub trait Component<D: Document> {
    /// Stable name used in logs and mount reports.
    fn name(&self) -> &'static str;

    fn interests(&self) -> Interest;

    /// Locate elements and register listeners and observers.
    ///
    /// An error disables the component (or fails the page in strict mode);
    /// any timers it scheduled are cancelled.
    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError>;

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        let _ = (event, cx);
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_, D>) {
        let _ = (token, cx);
    }

    /// Release observers and stop loops. Pending timers are cancelled by the
    /// runner afterwards.
    fn shutdown(&mut self, cx: &mut Context<'_, D>) {
        let _ = cx;
    }
}
