#![forbid(unsafe_code)]

use folio_core::PageConfig;

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{DomEventKind, Document, ListenTarget};

const NAME: &str = "mobile-nav";

/// Opens and closes the navigation panel on small screens.
#[derive(Debug)]
pub struct MobileNav<N> {
    toggle_id: String,
    panel_id: String,
    link_selector: String,
    class: String,
    toggle: Option<N>,
    panel: Option<N>,
    links: Vec<N>,
}

impl<N> MobileNav<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            toggle_id: config.selectors.nav_toggle_id.clone(),
            panel_id: config.selectors.nav_links_id.clone(),
            link_selector: config.selectors.nav_link.clone(),
            class: config.nav_toggle.active_class.clone(),
            toggle: None,
            panel: None,
            links: Vec::new(),
        }
    }
}

impl<D: Document> Component<D> for MobileNav<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::CLICK
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        let toggle = require_id(&*cx.doc, NAME, &self.toggle_id)?;
        let panel = require_id(&*cx.doc, NAME, &self.panel_id)?;
        self.links = cx.doc.query_within(&panel, &self.link_selector);

        cx.doc.listen(ListenTarget::Node(&toggle), DomEventKind::Click);
        for link in &self.links {
            cx.doc.listen(ListenTarget::Node(link), DomEventKind::Click);
        }
        self.toggle = Some(toggle);
        self.panel = Some(panel);
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        let PageEvent::Click(node) = event else {
            return;
        };
        let (Some(toggle), Some(panel)) = (self.toggle.as_ref(), self.panel.as_ref()) else {
            return;
        };
        if node == toggle {
            cx.doc.toggle_class(toggle, &self.class);
            cx.doc.toggle_class(panel, &self.class);
        } else if self.links.contains(node) {
            cx.doc.remove_class(toggle, &self.class);
            cx.doc.remove_class(panel, &self.class);
        }
    }
}
