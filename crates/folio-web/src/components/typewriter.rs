#![forbid(unsafe_code)]

use folio_core::PageConfig;
use folio_core::typewriter::Typewriter;
use tracing::debug;

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest};
use crate::host::Document;
use crate::timers::TimerId;

const NAME: &str = "typewriter";

/// Types and deletes the configured lines into the typing element forever.
///
/// Each tick schedules the next one, so there is exactly one pending timer
/// while the effect runs.
#[derive(Debug)]
pub struct TypewriterEffect<N> {
    element_id: String,
    machine: Typewriter,
    node: Option<N>,
    timer: Option<TimerId>,
}

impl<N> TypewriterEffect<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            element_id: config.selectors.typing_text_id.clone(),
            machine: Typewriter::new(&config.typewriter.texts, config.typewriter.timing()),
            node: None,
            timer: None,
        }
    }
}

impl<D: Document> Component<D> for TypewriterEffect<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::empty()
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        let node = require_id(&*cx.doc, NAME, &self.element_id)?;
        self.node = Some(node);
        if self.machine.is_idle() {
            debug!("typewriter has no lines; staying idle");
            return Ok(());
        }
        self.timer = Some(cx.schedule(self.machine.timing().start_delay, 0));
        Ok(())
    }

    fn on_timer(&mut self, _token: u64, cx: &mut Context<'_, D>) {
        let Some(node) = self.node.as_ref() else {
            return;
        };
        self.timer = match self.machine.tick() {
            Some(tick) => {
                cx.doc.set_text(node, tick.text);
                Some(cx.schedule(tick.delay, 0))
            }
            None => None,
        };
    }

    fn shutdown(&mut self, cx: &mut Context<'_, D>) {
        if let Some(id) = self.timer.take() {
            cx.cancel(id);
        }
    }
}
