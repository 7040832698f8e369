#![forbid(unsafe_code)]

use std::time::Duration;

use folio_core::PageConfig;
use folio_core::animation::{Animation, ScrollTween};
use folio_core::smooth_scroll::{ScrollMode, destination, fragment_id};
use tracing::debug;

use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{DomEventKind, Document, ListenTarget, ScrollBehavior};

const NAME: &str = "smooth-scroll";

/// Turns in-page anchor clicks into a scroll that clears the fixed navbar.
///
/// In [`ScrollMode::Tween`] the scroll is driven from animation frames
/// instead of the host's native smooth scrolling.
#[derive(Debug)]
pub struct SmoothScroll<N> {
    anchor_selector: String,
    navbar_id: String,
    mode: ScrollMode,
    anchors: Vec<N>,
    tween: Option<ScrollTween>,
    last_frame: Duration,
}

impl<N> SmoothScroll<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            anchor_selector: config.selectors.anchors.clone(),
            navbar_id: config.selectors.navbar_id.clone(),
            mode: config.smooth_scroll.mode,
            anchors: Vec::new(),
            tween: None,
            last_frame: Duration::ZERO,
        }
    }
}

impl<D: Document> Component<D> for SmoothScroll<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        match self.mode {
            ScrollMode::Native => Interest::CLICK,
            ScrollMode::Tween { .. } => Interest::CLICK | Interest::FRAME,
        }
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        self.anchors = cx.doc.query_all(&self.anchor_selector);
        for anchor in &self.anchors {
            cx.doc.listen(ListenTarget::Node(anchor), DomEventKind::Click);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        match event {
            PageEvent::Click(node) if self.anchors.contains(node) => {
                cx.prevent_default();
                let href = cx.doc.attribute(node, "href").unwrap_or_default();
                let Some(target) = fragment_id(&href).and_then(|id| cx.doc.element_by_id(id))
                else {
                    debug!(href = %href, "anchor target missing");
                    return;
                };
                // The navbar is looked up per click; a page without one
                // scrolls flush to the target.
                let header = cx
                    .doc
                    .element_by_id(&self.navbar_id)
                    .map_or(0.0, |nav| cx.doc.offset_height(&nav));
                let top = destination(cx.doc.offset_top(&target), header);

                match self.mode.tween_duration() {
                    None => cx.doc.scroll_to(top, ScrollBehavior::Smooth),
                    Some(duration) => {
                        self.tween = Some(ScrollTween::new(cx.doc.scroll_y(), top, duration));
                        self.last_frame = cx.now();
                    }
                }
            }
            PageEvent::Frame => {
                let Some(tween) = self.tween.as_mut() else {
                    return;
                };
                let now = cx.now();
                tween.tick(now.saturating_sub(self.last_frame));
                self.last_frame = now;
                cx.doc.scroll_to(tween.position(), ScrollBehavior::Instant);
                if tween.is_complete() {
                    self.tween = None;
                }
            }
            _ => {}
        }
    }

    fn shutdown(&mut self, _cx: &mut Context<'_, D>) {
        self.tween = None;
    }
}
