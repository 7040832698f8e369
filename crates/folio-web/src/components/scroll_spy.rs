#![forbid(unsafe_code)]

use folio_core::PageConfig;
use folio_core::scroll::{active_section, link_targets};

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::Document;

const NAME: &str = "scroll-spy";

/// Highlights the navigation link of the section being read.
///
/// Section tops and panel links are read on every scroll so layout changes
/// and links added later are picked up.
#[derive(Debug)]
pub struct ScrollSpy<N> {
    sections_selector: String,
    panel_id: String,
    link_selector: String,
    offset: f64,
    color: String,
    sections: Vec<N>,
    panel: Option<N>,
}

impl<N> ScrollSpy<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            sections_selector: config.selectors.sections.clone(),
            panel_id: config.selectors.nav_links_id.clone(),
            link_selector: config.selectors.nav_link.clone(),
            offset: config.scroll_spy.offset,
            color: config.scroll_spy.highlight_color.clone(),
            sections: Vec::new(),
            panel: None,
        }
    }

    fn refresh<D: Document<Node = N>>(&self, doc: &mut D) {
        let Some(panel) = self.panel.as_ref() else {
            return;
        };
        let tops: Vec<(Option<String>, f64)> = self
            .sections
            .iter()
            .map(|s| (doc.attribute(s, "id"), doc.offset_top(s)))
            .collect();
        let current = active_section(
            tops.iter().map(|(id, top)| (id.as_deref(), *top)),
            doc.scroll_y(),
            self.offset,
        );

        for link in doc.query_within(panel, &self.link_selector) {
            doc.set_style(&link, "color", "");
            let Some(id) = current else {
                continue;
            };
            let targets = doc
                .attribute(&link, "href")
                .is_some_and(|href| link_targets(&href, id));
            if targets {
                doc.set_style(&link, "color", &self.color);
            }
        }
    }
}

impl<D: Document> Component<D> for ScrollSpy<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::SCROLL
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        self.panel = Some(require_id(&*cx.doc, NAME, &self.panel_id)?);
        self.sections = cx.doc.query_all(&self.sections_selector);
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        if matches!(event, PageEvent::Scroll) {
            self.refresh(cx.doc);
        }
    }
}
