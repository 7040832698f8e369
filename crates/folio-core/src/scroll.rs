#![forbid(unsafe_code)]

//! Scroll-position rules: navbar styling and active-section tracking.
//!
//! Both are pure functions of the current vertical scroll offset and are
//! cheap enough to run on every scroll event without debouncing.

/// Whether the navbar should carry its "scrolled" styling.
#[inline]
#[must_use]
pub fn navbar_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Id of the section the reader is currently in.
///
/// `sections` yields `(id, top)` pairs in document order. A section counts as
/// reached once `scroll_y >= top - offset`; the last reached section wins.
/// Sections without an id can still win, in which case no link matches and
/// the result is `None`, same as when no section has been reached.
pub fn active_section<'a, I>(sections: I, scroll_y: f64, offset: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = (Option<&'a str>, f64)>,
{
    let mut current = None;
    for (id, top) in sections {
        if scroll_y >= top - offset {
            current = id;
        }
    }
    current
}

/// Whether a navigation link's `href` points at the section `id`.
#[inline]
#[must_use]
pub fn link_targets(href: &str, id: &str) -> bool {
    href.strip_prefix('#') == Some(id)
}
