#![forbid(unsafe_code)]

//! Step-based page runner.
//!
//! [`Page`] owns the document, the preference storage and every component,
//! and drives them without threads or blocking. The host controls the loop:
//!
//! 1. Call [`Page::mount`] once.
//! 2. Push events via [`Page::push_event`] (or [`Page::dispatch`] when the
//!    host needs an answer, such as whether to suppress a click's default).
//! 3. Advance time via [`Page::advance_time`] or [`Page::set_time`].
//! 4. Call [`Page::step`] to drain queued events and fire due timers.
//! 5. Re-arm the host timer from [`Page::next_deadline`] and keep an
//!    animation-frame loop alive while [`Page::wants_frames`] holds.
//!
//! # Invariants
//!
//! 1. Components see events in push order; timers fire in deadline order
//!    after the queued events of the same step.
//! 2. A disabled component never receives events or timer callbacks.
//! 3. After [`Page::shutdown`] no timers remain and nothing is delivered.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | mount error | missing element or canvas | component disabled; strict mode fails |
//! | runaway timers | rescheduling at the same instant | capped per step, rest deferred |
//! | host stall | tab throttled or suspended | replayed, or resynced past the lag limit |

use std::collections::VecDeque;
use std::time::Duration;

use folio_core::PageConfig;
use tracing::{debug, info, warn};

use crate::component::{Component, Context, Interest, PageEvent};
use crate::components;
use crate::host::{DomEventKind, Document, ListenTarget};
use crate::storage::StorageBackend;
use crate::timers::TimerQueue;
use crate::{DeterministicClock, PageError};

/// Upper bound on timer callbacks run by a single [`Page::step`].
pub const MAX_TIMER_FIRINGS_PER_STEP: u32 = 10_000;

/// Result of a single [`Page::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the page is still running (false after shutdown).
    pub running: bool,
    /// Number of queued events delivered during this step.
    pub events_processed: u32,
    /// Number of timer callbacks run during this step.
    pub timers_fired: u32,
    /// Frame events seen so far.
    pub frame_idx: u64,
}

/// Outcome of delivering one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// A component asked to suppress the host's default action.
    pub default_prevented: bool,
    /// Number of components the event reached.
    pub delivered: u32,
}

/// Which components came up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MountReport {
    pub mounted: Vec<&'static str>,
    pub skipped: Vec<(&'static str, PageError)>,
}

struct Slot<D: Document> {
    component: Box<dyn Component<D>>,
    active: bool,
}

/// Host-driven runner for a set of page components.
pub struct Page<D: Document> {
    doc: D,
    storage: Box<dyn StorageBackend>,
    slots: Vec<Slot<D>>,
    timers: TimerQueue,
    clock: DeterministicClock,
    queue: VecDeque<PageEvent<D::Node>>,
    strict: bool,
    mounted: bool,
    running: bool,
    frame_idx: u64,
}

impl<D: Document + 'static> Page<D> {
    /// Create a page running the standard components for `config`.
    pub fn new(
        config: &PageConfig,
        doc: D,
        storage: Box<dyn StorageBackend>,
    ) -> Result<Self, PageError> {
        config.validate()?;
        Ok(Self::with_components(
            doc,
            storage,
            components::standard(config),
            config.strict,
        ))
    }
}

impl<D: Document> Page<D> {
    /// Create a page from an explicit component list.
    pub fn with_components(
        doc: D,
        storage: Box<dyn StorageBackend>,
        components: Vec<Box<dyn Component<D>>>,
        strict: bool,
    ) -> Self {
        let slots = components
            .into_iter()
            .map(|component| Slot {
                component,
                active: false,
            })
            .collect();
        Self {
            doc,
            storage,
            slots,
            timers: TimerQueue::new(),
            clock: DeterministicClock::new(),
            queue: VecDeque::new(),
            strict,
            mounted: false,
            running: false,
            frame_idx: 0,
        }
    }

    /// Mount every component in order.
    ///
    /// Window scroll and resize listeners are registered once, after the
    /// components, if any mounted component wants them.
    pub fn mount(&mut self) -> Result<MountReport, PageError> {
        if self.mounted {
            return Err(PageError::AlreadyMounted);
        }
        self.mounted = true;
        self.running = true;

        let mut report = MountReport::default();
        let mut failure = None;
        {
            let Self {
                doc,
                storage,
                slots,
                timers,
                clock,
                strict,
                ..
            } = self;
            let now = clock.now();
            for (owner, slot) in slots.iter_mut().enumerate() {
                let name = slot.component.name();
                let mut cx = Context::new(doc, &**storage, timers, owner, now);
                match slot.component.mount(&mut cx) {
                    Ok(()) => {
                        slot.active = true;
                        report.mounted.push(name);
                    }
                    Err(err) => {
                        timers.cancel_owner(owner);
                        if *strict {
                            failure = Some(err);
                            break;
                        }
                        warn!(component = name, error = %err, "component disabled");
                        report.skipped.push((name, err));
                    }
                }
            }
        }

        if let Some(err) = failure {
            self.shutdown();
            return Err(err);
        }

        let interests = self.active_interests();
        if interests.contains(Interest::SCROLL) {
            self.doc.listen(ListenTarget::Window, DomEventKind::Scroll);
        }
        if interests.contains(Interest::RESIZE) {
            self.doc.listen(ListenTarget::Window, DomEventKind::Resize);
        }
        info!(
            mounted = report.mounted.len(),
            skipped = report.skipped.len(),
            "page mounted"
        );
        Ok(report)
    }

    /// Queue an event for the next [`Page::step`].
    pub fn push_event(&mut self, event: PageEvent<D::Node>) {
        self.queue.push_back(event);
    }

    /// Advance the page clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Move the page clock to an absolute host time. Never goes backwards.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Deliver one event immediately to every interested active component.
    pub fn dispatch(&mut self, event: PageEvent<D::Node>) -> Dispatch {
        if !self.running {
            return Dispatch::default();
        }
        if matches!(event, PageEvent::Frame) {
            self.frame_idx += 1;
        }
        let wanted = event.interest();
        let Self {
            doc,
            storage,
            slots,
            timers,
            clock,
            ..
        } = self;
        let now = clock.now();
        let mut out = Dispatch::default();
        for (owner, slot) in slots.iter_mut().enumerate() {
            if !slot.active || !slot.component.interests().contains(wanted) {
                continue;
            }
            let mut cx = Context::new(doc, &**storage, timers, owner, now);
            slot.component.on_event(&event, &mut cx);
            out.delivered += 1;
            out.default_prevented |= cx.default_prevented();
        }
        out
    }

    /// Drain queued events, then run every timer due at the current time.
    pub fn step(&mut self) -> StepResult {
        let mut events_processed = 0u32;
        while let Some(event) = self.queue.pop_front() {
            self.dispatch(event);
            events_processed = events_processed.saturating_add(1);
        }
        let timers_fired = self.fire_due_timers();
        StepResult {
            running: self.running,
            events_processed,
            timers_fired,
            frame_idx: self.frame_idx,
        }
    }

    fn fire_due_timers(&mut self) -> u32 {
        if !self.running {
            return 0;
        }
        let Self {
            doc,
            storage,
            slots,
            timers,
            clock,
            ..
        } = self;
        let now = clock.now();
        let mut fired = 0u32;
        while fired < MAX_TIMER_FIRINGS_PER_STEP {
            let Some(due) = timers.pop_due(now) else {
                return fired;
            };
            let Some(slot) = slots.get_mut(due.owner) else {
                timers.cancel(due.id);
                continue;
            };
            if !slot.active {
                timers.cancel(due.id);
                continue;
            }
            let mut cx = Context::new(doc, &**storage, timers, due.owner, due.fired_at);
            slot.component.on_timer(due.token, &mut cx);
            fired += 1;
        }
        warn!(
            limit = MAX_TIMER_FIRINGS_PER_STEP,
            "timer firing limit reached; remaining timers deferred"
        );
        fired
    }

    /// Resync timers that fall more than `max_lag` behind instead of
    /// replaying each missed firing. `None` (the default) replays exactly.
    pub fn set_max_timer_lag(&mut self, max_lag: Option<Duration>) {
        self.timers.set_max_lag(max_lag);
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.running {
            self.timers.next_deadline()
        } else {
            None
        }
    }

    /// Whether the host should keep an animation-frame loop running.
    #[must_use]
    pub fn wants_frames(&self) -> bool {
        self.running && self.active_interests().contains(Interest::FRAME)
    }

    /// Union of the interests of every active component.
    #[must_use]
    pub fn active_interests(&self) -> Interest {
        self.slots
            .iter()
            .filter(|s| s.active)
            .fold(Interest::empty(), |acc, s| acc | s.component.interests())
    }

    /// Stop every component, cancel all timers and drop queued events.
    /// Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let Self {
            doc,
            storage,
            slots,
            timers,
            clock,
            queue,
            ..
        } = self;
        let now = clock.now();
        for (owner, slot) in slots.iter_mut().enumerate() {
            if !slot.active {
                continue;
            }
            let mut cx = Context::new(doc, &**storage, timers, owner, now);
            slot.component.shutdown(&mut cx);
            slot.active = false;
        }
        timers.clear();
        queue.clear();
        debug!("page shut down");
    }

    // --- accessors ---------------------------------------------------------

    #[must_use]
    pub fn doc(&self) -> &D {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    #[must_use]
    pub fn storage(&self) -> &dyn StorageBackend {
        &*self.storage
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Whether the component called `name` is mounted and running.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.active && s.component.name() == name)
    }

    /// Names of all components, in mount order.
    pub fn component_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|s| s.component.name())
    }
}
