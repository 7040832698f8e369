#![forbid(unsafe_code)]

//! Host seams: the document the page manipulates and the canvas it draws on.
//!
//! Components only ever see these traits. The browser binding implements them
//! over `web-sys`; [`crate::memory::MemoryDocument`] implements them in memory.
//!
//! Queries return owned node handles. Writes are best-effort: a host that
//! cannot apply a write drops it, matching how a DOM ignores writes to
//! detached nodes.

use std::fmt::Debug;

use folio_core::viewport::ObserverOptions;

/// Scroll animation requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Host animates the scroll itself.
    #[default]
    Smooth,
    /// Jump straight to the offset.
    Instant,
}

/// Events a component may ask the host to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
    Click,
    Scroll,
    Resize,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget<'a, N> {
    Window,
    Node(&'a N),
}

/// Names one intersection observer. Every observer key maps to a single
/// host observer with fixed options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverKey(pub &'static str);

impl ObserverKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// The page document.
pub trait Document {
    /// Handle to one element.
    type Node: Clone + PartialEq + Debug + 'static;

    // --- queries -----------------------------------------------------------

    /// The document root (`<html>`).
    fn root(&self) -> Self::Node;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    // --- attributes and text -----------------------------------------------

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Flip `class`, returning whether it is now present.
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Replace the element's text content.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Set one inline style property. An empty value clears it.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    // --- geometry and scrolling --------------------------------------------

    /// Distance from the document top to the element's top edge.
    fn offset_top(&self, node: &Self::Node) -> f64;

    fn offset_height(&self, node: &Self::Node) -> f64;

    /// Layout size of the element's parent, `(width, height)`.
    fn parent_size(&self, node: &Self::Node) -> (f64, f64);

    /// Current vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    // --- subscriptions -----------------------------------------------------

    /// Start forwarding `kind` events from `target` to the page.
    fn listen(&mut self, target: ListenTarget<'_, Self::Node>, kind: DomEventKind);

    /// Watch `node` with the observer named `key`, creating it on first use.
    fn observe(&mut self, key: ObserverKey, options: &ObserverOptions, node: &Self::Node);

    /// Stop watching `node` with observer `key`.
    fn unobserve(&mut self, key: ObserverKey, node: &Self::Node);

    /// Drop observer `key` and everything it watches.
    fn disconnect(&mut self, key: ObserverKey);

    // --- canvas ------------------------------------------------------------

    /// 2D drawing surface for a canvas element, if it has one.
    fn surface(&mut self, node: &Self::Node) -> Option<Box<dyn Surface>>;
}

/// Minimal 2D drawing surface.
pub trait Surface {
    /// Resize the backing store. Resizing also clears it.
    fn set_size(&mut self, width: f64, height: f64);

    fn size(&self) -> (f64, f64);

    fn clear(&mut self);

    /// Fill a circle of `radius` at `(x, y)` with a CSS color.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);

    /// Stroke a straight line with a CSS color.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str);
}
