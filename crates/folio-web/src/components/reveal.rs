#![forbid(unsafe_code)]

use folio_core::PageConfig;
use folio_core::viewport::ObserverOptions;
use tracing::debug;

use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{Document, ObserverKey};

const NAME: &str = "reveal";

pub const REVEAL_OBSERVER: ObserverKey = ObserverKey("reveal");

/// Adds the active class to tagged elements as they scroll into view.
///
/// Add-only: leaving the viewport never removes the class, and elements stay
/// observed so a class removed by someone else is put back.
#[derive(Debug)]
pub struct RevealOnScroll<N> {
    selector: String,
    options: ObserverOptions,
    class: String,
    targets: Vec<N>,
}

impl<N> RevealOnScroll<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            selector: config.selectors.reveal.clone(),
            options: config.reveal.observer,
            class: config.reveal.active_class.clone(),
            targets: Vec::new(),
        }
    }
}

impl<D: Document> Component<D> for RevealOnScroll<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::INTERSECTION
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        self.targets = cx.doc.query_all(&self.selector);
        for target in &self.targets {
            cx.doc.observe(REVEAL_OBSERVER, &self.options, target);
        }
        debug!(targets = self.targets.len(), "reveal observing");
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
        if *observer == REVEAL_OBSERVER && *is_intersecting && self.targets.contains(target) {
            cx.doc.add_class(target, &self.class);
        }
    }

    fn shutdown(&mut self, cx: &mut Context<'_, D>) {
        cx.doc.disconnect(REVEAL_OBSERVER);
    }
}
