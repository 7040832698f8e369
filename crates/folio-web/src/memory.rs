#![forbid(unsafe_code)]

//! In-memory document for tests and native hosts.
//!
//! [`MemoryDocument`] keeps a small element tree with attributes, classes,
//! inline styles, text and a layout rectangle per element. It records every
//! listener, observation, scroll and canvas draw so tests can assert on them.
//!
//! Geometry is absolute: an element's rectangle is in document coordinates,
//! so `offset_top` is simply `rect.y`. The viewport is the window rectangle
//! at `(0, scroll_y)`.
//!
//! Selectors support comma-separated lists of compound selectors built from
//! a tag, `#id`, `.class`, `[attr]`, `[attr="v"]` and `[attr^="v"]`.
//! Combinators are not supported; a selector using one matches nothing.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use folio_core::viewport::{ObserverOptions, Rect, intersection_ratio};

use crate::component::PageEvent;
use crate::host::{DomEventKind, Document, ListenTarget, ObserverKey, ScrollBehavior, Surface};

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    style: BTreeMap<String, String>,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
    rect: Rect,
}

impl Element {
    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            if self.classes.is_empty() {
                None
            } else {
                Some(self.classes.join(" "))
            }
        } else {
            self.attrs.get(name).cloned()
        }
    }
}

/// Builder for a new element.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    rect: Rect,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }
}

// ---------------------------------------------------------------------------
// Canvas recording
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: String,
    },
}

/// Everything drawn on one canvas since its last clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasLog {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
    /// Number of clears, including those caused by resizing.
    pub clears: u64,
}

impl CanvasLog {
    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

/// A [`Surface`] that appends to a shared [`CanvasLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<CanvasLog>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn snapshot(&self) -> CanvasLog {
        self.log.borrow().clone()
    }
}

impl Surface for RecordingSurface {
    fn set_size(&mut self, width: f64, height: f64) {
        let mut log = self.log.borrow_mut();
        log.width = width;
        log.height = height;
        log.ops.clear();
        log.clears += 1;
    }

    fn size(&self) -> (f64, f64) {
        let log = self.log.borrow();
        (log.width, log.height)
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.ops.clear();
        log.clears += 1;
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.log.borrow_mut().ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color: color.to_owned(),
        });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
        self.log.borrow_mut().ops.push(DrawOp::Line {
            from,
            to,
            width,
            color: color.to_owned(),
        });
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Observer {
    options: ObserverOptions,
    targets: Vec<NodeRef>,
    /// Last reported state; absent until the first report.
    reported: HashMap<NodeRef, bool>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    viewport: (f64, f64),
    scroll_y: f64,
    scroll_log: Vec<(f64, ScrollBehavior)>,
    listeners: Vec<(Option<NodeRef>, DomEventKind)>,
    observers: BTreeMap<ObserverKey, Observer>,
    canvases: HashMap<NodeRef, RecordingSurface>,
}

const ROOT: NodeRef = NodeRef(0);
const BODY: NodeRef = NodeRef(1);

impl MemoryDocument {
    /// An empty `<html><body></body></html>` with the given window size.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let full = Rect::new(0.0, 0.0, viewport_width, viewport_height);
        let root = Element {
            tag: "html".into(),
            children: vec![BODY],
            rect: full,
            ..Element::default()
        };
        let body = Element {
            tag: "body".into(),
            parent: Some(ROOT),
            rect: full,
            ..Element::default()
        };
        Self {
            elements: vec![root, body],
            viewport: (viewport_width, viewport_height),
            scroll_y: 0.0,
            scroll_log: Vec::new(),
            listeners: Vec::new(),
            observers: BTreeMap::new(),
            canvases: HashMap::new(),
        }
    }

    #[must_use]
    pub fn body(&self) -> NodeRef {
        BODY
    }

    /// Append a child element to `parent`. An unknown parent means `<body>`.
    pub fn append(&mut self, parent: NodeRef, spec: ElementSpec) -> NodeRef {
        let parent = if parent.0 < self.elements.len() {
            parent
        } else {
            BODY
        };
        let node = NodeRef(self.elements.len());
        self.elements.push(Element {
            tag: spec.tag,
            attrs: spec.attrs.into_iter().collect(),
            classes: spec.classes,
            text: spec.text,
            style: BTreeMap::new(),
            parent: Some(parent),
            children: Vec::new(),
            rect: spec.rect,
        });
        self.elements[parent.0].children.push(node);
        node
    }

    pub fn append_to_body(&mut self, spec: ElementSpec) -> NodeRef {
        self.append(BODY, spec)
    }

    fn el(&self, node: &NodeRef) -> Option<&Element> {
        self.elements.get(node.0)
    }

    fn el_mut(&mut self, node: &NodeRef) -> Option<&mut Element> {
        self.elements.get_mut(node.0)
    }

    // --- layout ------------------------------------------------------------

    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Resize the window. The root and body follow the new size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        for node in [ROOT, BODY] {
            if let Some(el) = self.el_mut(&node) {
                el.rect.width = width;
                el.rect.height = height;
            }
        }
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    #[must_use]
    pub fn rect(&self, node: NodeRef) -> Option<Rect> {
        self.el(&node).map(|el| el.rect)
    }

    pub fn set_rect(&mut self, node: NodeRef, rect: Rect) {
        if let Some(el) = self.el_mut(&node) {
            el.rect = rect;
        }
    }

    /// Height of the laid-out content.
    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.elements
            .iter()
            .map(|el| el.rect.bottom())
            .fold(self.viewport.1, f64::max)
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport.1).max(0.0)
    }

    /// Move the window without recording a programmatic scroll, as a user
    /// scrolling would.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// The window rectangle in document coordinates.
    #[must_use]
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport.0, self.viewport.1)
    }

    /// Programmatic scrolls, in order.
    #[must_use]
    pub fn scroll_log(&self) -> &[(f64, ScrollBehavior)] {
        &self.scroll_log
    }

    // --- inspection --------------------------------------------------------

    #[must_use]
    pub fn text(&self, node: NodeRef) -> &str {
        self.el(&node).map_or("", |el| el.text.as_str())
    }

    #[must_use]
    pub fn style(&self, node: NodeRef, property: &str) -> Option<&str> {
        self.el(&node)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    #[must_use]
    pub fn classes(&self, node: NodeRef) -> &[String] {
        self.el(&node).map_or(&[], |el| el.classes.as_slice())
    }

    /// Registered listeners; `None` is the window.
    #[must_use]
    pub fn listeners(&self) -> &[(Option<NodeRef>, DomEventKind)] {
        &self.listeners
    }

    #[must_use]
    pub fn is_listening(&self, node: NodeRef, kind: DomEventKind) -> bool {
        self.listeners.contains(&(Some(node), kind))
    }

    /// Elements currently watched by observer `key`.
    #[must_use]
    pub fn observed(&self, key: ObserverKey) -> &[NodeRef] {
        self.observers
            .get(&key)
            .map_or(&[], |o| o.targets.as_slice())
    }

    #[must_use]
    pub fn observer_options(&self, key: ObserverKey) -> Option<ObserverOptions> {
        self.observers.get(&key).map(|o| o.options)
    }

    /// What has been drawn on `canvas` since its last clear.
    #[must_use]
    pub fn canvas_log(&self, canvas: NodeRef) -> Option<CanvasLog> {
        self.canvases.get(&canvas).map(RecordingSurface::snapshot)
    }

    /// Intersection entries for every observed element whose state changed
    /// since the last call. A newly observed element always reports once.
    pub fn intersection_events(&mut self) -> Vec<PageEvent<NodeRef>> {
        let viewport = self.viewport_rect();
        let mut events = Vec::new();
        for (key, observer) in &mut self.observers {
            for target in &observer.targets {
                let Some(el) = self.elements.get(target.0) else {
                    continue;
                };
                let ratio = intersection_ratio(viewport, observer.options.root_margin, el.rect);
                let now = observer.options.is_satisfied(ratio);
                if observer.reported.insert(*target, now) != Some(now) {
                    events.push(PageEvent::Intersection {
                        observer: *key,
                        target: *target,
                        is_intersecting: now,
                    });
                }
            }
        }
        events
    }

    fn descendants(&self, scope: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = self
            .el(&scope)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(el) = self.el(&node) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    fn select(
        &self,
        candidates: impl IntoIterator<Item = NodeRef>,
        selector: &str,
    ) -> Vec<NodeRef> {
        let Some(list) = parse_selector_list(selector) else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|node| {
                self.el(node)
                    .is_some_and(|el| list.iter().any(|c| matches_compound(el, c)))
            })
            .collect()
    }
}

impl Document for MemoryDocument {
    type Node = NodeRef;

    fn root(&self) -> NodeRef {
        ROOT
    }

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        std::iter::once(ROOT)
            .chain(self.descendants(ROOT))
            .find(|n| self.el(n).and_then(|el| el.attrs.get("id")).is_some_and(|v| v == id))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeRef> {
        self.select(std::iter::once(ROOT).chain(self.descendants(ROOT)), selector)
    }

    fn query_within(&self, scope: &NodeRef, selector: &str) -> Vec<NodeRef> {
        self.select(self.descendants(*scope), selector)
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.el(node).and_then(|el| el.attribute(name))
    }

    fn set_attribute(&mut self, node: &NodeRef, name: &str, value: &str) {
        let Some(el) = self.el_mut(node) else {
            return;
        };
        if name == "class" {
            el.classes = value.split_whitespace().map(str::to_owned).collect();
        } else {
            el.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&mut self, node: &NodeRef, name: &str) {
        let Some(el) = self.el_mut(node) else {
            return;
        };
        if name == "class" {
            el.classes.clear();
        } else {
            el.attrs.remove(name);
        }
    }

    fn add_class(&mut self, node: &NodeRef, class: &str) {
        if let Some(el) = self.el_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_owned());
            }
        }
    }

    fn remove_class(&mut self, node: &NodeRef, class: &str) {
        if let Some(el) = self.el_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn toggle_class(&mut self, node: &NodeRef, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            self.has_class(node, class)
        }
    }

    fn has_class(&self, node: &NodeRef, class: &str) -> bool {
        self.el(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn set_text(&mut self, node: &NodeRef, text: &str) {
        if let Some(el) = self.el_mut(node) {
            el.text = text.to_owned();
        }
    }

    fn set_style(&mut self, node: &NodeRef, property: &str, value: &str) {
        let Some(el) = self.el_mut(node) else {
            return;
        };
        if value.is_empty() {
            el.style.remove(property);
        } else {
            el.style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn offset_top(&self, node: &NodeRef) -> f64 {
        self.el(node).map_or(0.0, |el| el.rect.y)
    }

    fn offset_height(&self, node: &NodeRef) -> f64 {
        self.el(node).map_or(0.0, |el| el.rect.height)
    }

    fn parent_size(&self, node: &NodeRef) -> (f64, f64) {
        self.el(node)
            .and_then(|el| el.parent)
            .and_then(|p| self.el(&p))
            .map_or(self.viewport, |p| (p.rect.width, p.rect.height))
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_log.push((top, behavior));
        self.set_scroll_y(top);
    }

    fn listen(&mut self, target: ListenTarget<'_, NodeRef>, kind: DomEventKind) {
        let entry = match target {
            ListenTarget::Window => (None, kind),
            ListenTarget::Node(node) => (Some(*node), kind),
        };
        if !self.listeners.contains(&entry) {
            self.listeners.push(entry);
        }
    }

    fn observe(&mut self, key: ObserverKey, options: &ObserverOptions, node: &NodeRef) {
        let observer = self.observers.entry(key).or_insert_with(|| Observer {
            options: *options,
            targets: Vec::new(),
            reported: HashMap::new(),
        });
        if !observer.targets.contains(node) {
            observer.targets.push(*node);
        }
    }

    fn unobserve(&mut self, key: ObserverKey, node: &NodeRef) {
        if let Some(observer) = self.observers.get_mut(&key) {
            observer.targets.retain(|t| t != node);
            observer.reported.remove(node);
        }
    }

    fn disconnect(&mut self, key: ObserverKey) {
        self.observers.remove(&key);
    }

    fn surface(&mut self, node: &NodeRef) -> Option<Box<dyn Surface>> {
        if self.el(node)?.tag != "canvas" {
            return None;
        }
        let surface = self.canvases.entry(*node).or_default().clone();
        Some(Box::new(surface))
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, AttrMatch),
}

type Compound = Vec<Simple>;

fn parse_selector_list(input: &str) -> Option<Vec<Compound>> {
    input.split(',').map(|part| parse_compound(part.trim())).collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_name(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    if end == 0 { None } else { Some(s.split_at(end)) }
}

fn parse_compound(s: &str) -> Option<Compound> {
    if s.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        match c {
            '#' | '.' => {
                let (name, tail) = take_name(&rest[1..])?;
                out.push(if c == '#' {
                    Simple::Id(name.to_owned())
                } else {
                    Simple::Class(name.to_owned())
                });
                rest = tail;
            }
            '[' => {
                let end = rest.find(']')?;
                out.push(parse_attr(&rest[1..end])?);
                rest = &rest[end + 1..];
            }
            '*' if out.is_empty() => rest = &rest[1..],
            c if is_name_char(c) && out.is_empty() => {
                let (name, tail) = take_name(rest)?;
                out.push(Simple::Tag(name.to_ascii_lowercase()));
                rest = tail;
            }
            _ => return None,
        }
    }
    Some(out)
}

fn parse_attr(inner: &str) -> Option<Simple> {
    let inner = inner.trim();
    let Some(eq) = inner.find('=') else {
        let (name, tail) = take_name(inner)?;
        return tail.is_empty().then(|| Simple::Attr(name.to_owned(), AttrMatch::Exists));
    };
    let prefix = inner[..eq].ends_with('^');
    let name = inner[..eq].trim_end_matches('^').trim();
    let (name, tail) = take_name(name)?;
    if !tail.is_empty() {
        return None;
    }
    let value = unquote(inner[eq + 1..].trim())?.to_owned();
    let m = if prefix {
        AttrMatch::Prefix(value)
    } else {
        AttrMatch::Equals(value)
    };
    Some(Simple::Attr(name.to_owned(), m))
}

fn unquote(v: &str) -> Option<&str> {
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return Some(inner);
        }
    }
    v.chars().all(is_name_char).then_some(v)
}

fn matches_compound(el: &Element, compound: &Compound) -> bool {
    compound.iter().all(|simple| match simple {
        Simple::Tag(tag) => el.tag == *tag,
        Simple::Id(id) => el.attrs.get("id") == Some(id),
        Simple::Class(class) => el.classes.iter().any(|c| c == class),
        Simple::Attr(name, m) => match (el.attribute(name), m) {
            (None, _) => false,
            (Some(_), AttrMatch::Exists) => true,
            (Some(v), AttrMatch::Equals(want)) => v == *want,
            (Some(v), AttrMatch::Prefix(want)) => v.starts_with(want.as_str()),
        },
    })
}

// ---------------------------------------------------------------------------
// Sample page
// ---------------------------------------------------------------------------

/// Handles into the document built by [`sample_page`].
#[derive(Debug, Clone)]
pub struct SamplePage {
    pub navbar: NodeRef,
    pub nav_toggle: NodeRef,
    pub nav_links: NodeRef,
    /// Panel links to `#home`, `#about`, `#stats`, `#contact`.
    pub links: Vec<NodeRef>,
    pub theme_toggle: NodeRef,
    pub typing: NodeRef,
    pub hero: NodeRef,
    pub canvas: NodeRef,
    /// `#about`, `#stats`, `#contact`.
    pub sections: Vec<NodeRef>,
    pub reveals: Vec<NodeRef>,
    /// Stat numbers counting to 150, 40 and 7.
    pub counters: Vec<NodeRef>,
    /// Hero call-to-action linking to `#contact`.
    pub cta: NodeRef,
}

/// A 1280x800 landing page laid out like the stock site.
///
/// | Element | Top | Height |
/// |---------|-----|--------|
/// | `nav#navbar` | 0 | 70 |
/// | `section#home.hero` | 0 | 800 |
/// | `section#about.section` | 800 | 900 |
/// | `section#stats.section` | 1700 | 600 |
/// | `section#contact.section` | 2300 | 700 |
#[must_use]
pub fn sample_page() -> (MemoryDocument, SamplePage) {
    let mut doc = MemoryDocument::new(1280.0, 800.0);
    let body = doc.body();

    let navbar = doc.append(
        body,
        ElementSpec::new("nav").id("navbar").rect(0.0, 0.0, 1280.0, 70.0),
    );
    let nav_toggle = doc.append(
        navbar,
        ElementSpec::new("button").id("navToggle").class("nav-toggle"),
    );
    let nav_links = doc.append(
        navbar,
        ElementSpec::new("ul").id("navLinks").class("nav-links"),
    );
    let links = ["home", "about", "stats", "contact"]
        .iter()
        .map(|id| {
            let li = doc.append(nav_links, ElementSpec::new("li"));
            doc.append(li, ElementSpec::new("a").attr("href", &format!("#{id}")).text(id))
        })
        .collect();
    let theme_toggle = doc.append(navbar, ElementSpec::new("button").id("themeToggle"));

    let hero = doc.append(
        body,
        ElementSpec::new("section")
            .id("home")
            .class("hero")
            .rect(0.0, 0.0, 1280.0, 800.0),
    );
    let canvas = doc.append(
        hero,
        ElementSpec::new("canvas")
            .id("particleCanvas")
            .rect(0.0, 0.0, 1280.0, 800.0),
    );
    let typing = doc.append(hero, ElementSpec::new("span").id("typingText"));
    let cta = doc.append(
        hero,
        ElementSpec::new("a")
            .class("btn")
            .attr("href", "#contact")
            .rect(100.0, 500.0, 200.0, 50.0),
    );

    let about = doc.append(
        body,
        ElementSpec::new("section")
            .id("about")
            .class("section")
            .rect(0.0, 800.0, 1280.0, 900.0),
    );
    let about_card = doc.append(
        about,
        ElementSpec::new("div").class("reveal").rect(0.0, 900.0, 600.0, 300.0),
    );

    let stats = doc.append(
        body,
        ElementSpec::new("section")
            .id("stats")
            .class("section")
            .rect(0.0, 1700.0, 1280.0, 600.0),
    );
    let counters = [("150", 0.0), ("40", 400.0), ("7", 800.0)]
        .iter()
        .map(|(count, x)| {
            doc.append(
                stats,
                ElementSpec::new("span")
                    .class("stat-number")
                    .attr("data-count", count)
                    .text("0")
                    .rect(*x, 1800.0, 200.0, 80.0),
            )
        })
        .collect();

    let contact = doc.append(
        body,
        ElementSpec::new("section")
            .id("contact")
            .class("section")
            .rect(0.0, 2300.0, 1280.0, 700.0),
    );
    let contact_card = doc.append(
        contact,
        ElementSpec::new("div")
            .class("reveal")
            .rect(0.0, 2400.0, 600.0, 300.0),
    );

    let handles = SamplePage {
        navbar,
        nav_toggle,
        nav_links,
        links,
        theme_toggle,
        typing,
        hero,
        canvas,
        sections: vec![about, stats, contact],
        reveals: vec![about_card, contact_card],
        counters,
        cta,
    };
    (doc, handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selectors_match_like_the_page_uses_them() {
        let (doc, page) = sample_page();
        assert_eq!(doc.query_all(".reveal"), page.reveals);
        assert_eq!(doc.query_all(".stat-number"), page.counters);
        assert_eq!(
            doc.query_all(".section, .hero"),
            vec![page.hero, page.sections[0], page.sections[1], page.sections[2]]
        );
        let mut anchors = page.links.clone();
        anchors.push(page.cta);
        assert_eq!(doc.query_all("a[href^=\"#\"]"), anchors);
        assert_eq!(doc.query_within(&page.nav_links, "a"), page.links);
        assert_eq!(doc.query_all("span[data-count='40']"), vec![page.counters[1]]);
        assert_eq!(doc.query_all("*[data-count]").len(), 3);
    }

    #[test]
    fn unsupported_selectors_match_nothing() {
        let (doc, _) = sample_page();
        assert!(doc.query_all(".nav-links a").is_empty());
        assert!(doc.query_all("").is_empty());
        assert!(doc.query_all("[href^=#]").is_empty());
    }

    #[test]
    fn element_by_id_and_geometry() {
        let (doc, page) = sample_page();
        assert_eq!(doc.element_by_id("stats"), Some(page.sections[1]));
        assert_eq!(doc.element_by_id("missing"), None);
        assert_eq!(doc.offset_top(&page.sections[1]), 1700.0);
        assert_eq!(doc.offset_height(&page.navbar), 70.0);
        assert_eq!(doc.parent_size(&page.canvas), (1280.0, 800.0));
        assert_eq!(doc.document_height(), 3000.0);
    }

    #[test]
    fn classes_and_class_attribute_agree() {
        let (mut doc, page) = sample_page();
        assert!(doc.toggle_class(&page.nav_toggle, "active"));
        assert_eq!(
            doc.attribute(&page.nav_toggle, "class").as_deref(),
            Some("nav-toggle active")
        );
        assert!(!doc.toggle_class(&page.nav_toggle, "active"));
        doc.set_attribute(&page.nav_toggle, "class", "a  b");
        assert_eq!(
            doc.classes(page.nav_toggle).to_vec(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn scroll_is_clamped_and_logged() {
        let (mut doc, _) = sample_page();
        doc.scroll_to(-40.0, ScrollBehavior::Smooth);
        assert_eq!(doc.scroll_y(), 0.0);
        doc.scroll_to(9_999.0, ScrollBehavior::Instant);
        assert_eq!(doc.scroll_y(), 2200.0);
        assert_eq!(doc.scroll_log().len(), 2);
    }

    #[test]
    fn intersection_reports_changes_only() {
        let (mut doc, page) = sample_page();
        let opts = ObserverOptions {
            threshold: 0.5,
            ..ObserverOptions::default()
        };
        let key = ObserverKey("t");
        doc.observe(key, &opts, &page.counters[0]);

        let first = doc.intersection_events();
        assert_eq!(
            first,
            vec![PageEvent::Intersection {
                observer: key,
                target: page.counters[0],
                is_intersecting: false
            }]
        );
        assert!(doc.intersection_events().is_empty());

        doc.set_scroll_y(1200.0);
        let events = doc.intersection_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            PageEvent::Intersection {
                is_intersecting: true,
                ..
            }
        ));

        doc.unobserve(key, &page.counters[0]);
        doc.set_scroll_y(0.0);
        assert!(doc.intersection_events().is_empty());
    }

    #[test]
    fn surfaces_only_for_canvases() {
        let (mut doc, page) = sample_page();
        assert!(doc.surface(&page.hero).is_none());
        let mut s = doc.surface(&page.canvas).unwrap();
        s.set_size(10.0, 20.0);
        s.fill_circle(1.0, 2.0, 3.0, "red");
        let log = doc.canvas_log(page.canvas).unwrap();
        assert_eq!((log.width, log.height), (10.0, 20.0));
        assert_eq!(log.circles().count(), 1);
        assert_eq!(log.clears, 1);
    }
}
