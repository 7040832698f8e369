#![forbid(unsafe_code)]

//! Count-up animation for the stat numbers.
//!
//! # Invariants
//!
//! 1. Each stat element triggers at most once; it is unobserved as soon as it
//!    first intersects.
//! 2. Every run owns one interval timer, cancelled on the frame that shows the
//!    exact target.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | unparsable `data-count` | markup error | warning, element unobserved, text untouched |

use std::time::Duration;

use folio_core::PageConfig;
use folio_core::counter::{CountUp, parse_target};
use folio_core::viewport::ObserverOptions;
use tracing::{debug, warn};

use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{Document, ObserverKey};
use crate::timers::TimerId;

const NAME: &str = "counter";

pub const COUNTER_OBSERVER: ObserverKey = ObserverKey("counter");

#[derive(Debug)]
struct Run<N> {
    node: N,
    count: CountUp,
    timer: Option<TimerId>,
}

#[derive(Debug)]
pub struct CounterAnimator<N> {
    selector: String,
    options: ObserverOptions,
    attribute: String,
    steps: u32,
    interval: Duration,
    suffix: String,
    targets: Vec<N>,
    triggered: Vec<N>,
    runs: Vec<Run<N>>,
}

impl<N: PartialEq> CounterAnimator<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        let c = &config.counter;
        Self {
            selector: config.selectors.counter.clone(),
            options: c.observer,
            attribute: c.attribute.clone(),
            steps: c.steps,
            interval: c.interval(),
            suffix: c.suffix.clone(),
            targets: Vec::new(),
            triggered: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Number of elements whose animation has started (or failed to).
    #[must_use]
    pub fn triggered(&self) -> usize {
        self.triggered.len()
    }

    fn is_pending(&self, node: &N) -> bool {
        self.targets.contains(node) && !self.triggered.contains(node)
    }
}

impl<D: Document> Component<D> for CounterAnimator<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::INTERSECTION
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        self.targets = cx.doc.query_all(&self.selector);
        for target in &self.targets {
            cx.doc.observe(COUNTER_OBSERVER, &self.options, target);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        let PageEvent::Intersection {
            observer,
            target,
            is_intersecting,
        } = event
        else {
            return;
        };
        if *observer != COUNTER_OBSERVER || !*is_intersecting || !self.is_pending(target) {
            return;
        }
        cx.doc.unobserve(COUNTER_OBSERVER, target);
        self.triggered.push(target.clone());

        let raw = cx.doc.attribute(target, &self.attribute).unwrap_or_default();
        let value = match parse_target(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "counter target ignored");
                return;
            }
        };
        let token = self.runs.len() as u64;
        let timer = cx.schedule_every(self.interval, token);
        debug!(target = value, "counter started");
        self.runs.push(Run {
            node: target.clone(),
            count: CountUp::new(value, self.steps, self.suffix.as_str()),
            timer: Some(timer),
        });
    }

    fn on_timer(&mut self, token: u64, cx: &mut Context<'_, D>) {
        let Some(run) = usize::try_from(token)
            .ok()
            .and_then(|i| self.runs.get_mut(i))
        else {
            return;
        };
        let frame = run.count.tick();
        cx.doc.set_text(&run.node, &frame.text);
        if frame.finished {
            if let Some(id) = run.timer.take() {
                cx.cancel(id);
            }
            debug!(target = run.count.target(), "counter finished");
        }
    }

    fn shutdown(&mut self, cx: &mut Context<'_, D>) {
        for run in &mut self.runs {
            if let Some(id) = run.timer.take() {
                cx.cancel(id);
            }
        }
        cx.doc.disconnect(COUNTER_OBSERVER);
    }
}
