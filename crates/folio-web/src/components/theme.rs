#![forbid(unsafe_code)]

use folio_core::PageConfig;
use folio_core::Theme;
use tracing::{info, warn};

use super::require_id;
use crate::PageError;
use crate::component::{Component, Context, Interest, PageEvent};
use crate::host::{DomEventKind, Document, ListenTarget};

const NAME: &str = "theme";

/// Applies the stored theme at startup and flips it on each toggle click.
///
/// The stored preference is applied before the toggle is looked up, so a
/// page without a toggle still honors it.
#[derive(Debug)]
pub struct ThemeToggle<N> {
    toggle_id: String,
    storage_key: String,
    attribute: String,
    toggle: Option<N>,
}

impl<N> ThemeToggle<N> {
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            toggle_id: config.selectors.theme_toggle_id.clone(),
            storage_key: config.theme.storage_key.clone(),
            attribute: config.theme.attribute.clone(),
            toggle: None,
        }
    }
}

impl<D: Document> Component<D> for ThemeToggle<D::Node> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn interests(&self) -> Interest {
        Interest::CLICK
    }

    fn mount(&mut self, cx: &mut Context<'_, D>) -> Result<(), PageError> {
        let stored = cx.storage().get(&self.storage_key).unwrap_or_else(|err| {
            warn!(error = %err, backend = cx.storage().name(), "theme preference unreadable");
            None
        });
        if Theme::from_stored(stored.as_deref()) == Theme::Light {
            let root = cx.doc.root();
            cx.doc
                .set_attribute(&root, &self.attribute, Theme::Light.as_str());
        }

        let toggle = require_id(&*cx.doc, NAME, &self.toggle_id)?;
        cx.doc.listen(ListenTarget::Node(&toggle), DomEventKind::Click);
        self.toggle = Some(toggle);
        Ok(())
    }

    fn on_event(&mut self, event: &PageEvent<D::Node>, cx: &mut Context<'_, D>) {
        let PageEvent::Click(node) = event else {
            return;
        };
        if self.toggle.as_ref() != Some(node) {
            return;
        }
        let root = cx.doc.root();
        let current = Theme::from_attribute(cx.doc.attribute(&root, &self.attribute).as_deref());
        let next = current.toggled();
        match next.attribute_value() {
            Some(value) => cx.doc.set_attribute(&root, &self.attribute, value),
            None => cx.doc.remove_attribute(&root, &self.attribute),
        }
        if let Err(err) = cx.storage().set(&self.storage_key, next.as_str()) {
            warn!(error = %err, "theme preference not saved");
        }
        info!(theme = %next, "theme changed");
    }
}
