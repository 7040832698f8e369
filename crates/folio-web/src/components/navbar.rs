#![forbid(unsafe_code)]

use folio_core::PageConfig;
use folio_core::scroll::navbar_scrolled;

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::Document;

const NAME: &str = "navbar";

/// Marks the navbar as scrolled once the page leaves the top.
#[derive(Debug)]
pub struct NavbarScroll<N> {
    navbar_id: String,
    scrolled_after: f64,
    class: String,
    navbar: Option<N>,
}

impl<N> NavbarScroll<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            navbar_id: config.selectors.navbar_id.clone(),
            scrolled_after: config.navbar.scrolled_after,
            class: config.navbar.scrolled_class.clone(),
            navbar: None,
        }
    }

    fn sync<D: Document<Node = N>>(&self, doc: &mut D) {
        let Some(navbar) = self.navbar.as_ref() else {
            return;
        };
        if navbar_scrolled(doc.scroll_y(), self.scrolled_after) {
            doc.add_class(navbar, &self.class);
        } else {
            doc.remove_class(navbar, &self.class);
        }
    }
}

impl<D: Document> Component<D> for NavbarScroll<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::SCROLL
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        self.navbar = Some(require_id(&*cx.doc, NAME, &self.navbar_id)?);
        // A reload can restore a scrolled position.
        self.sync(cx.doc);
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        if matches!(event, PageEvent::Scroll) {
            self.sync(cx.doc);
        }
    }
}
