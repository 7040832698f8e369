#![forbid(unsafe_code)]

//! Viewport intersection math.
//!
//! Mirrors the parts of intersection observation the page relies on: a root
//! rectangle grown or shrunk by a [`RootMargin`], and the fraction of a target
//! rectangle that falls inside it. Browsers compute this natively; hosts
//! without an observer (tests, the simulator) use [`intersection_ratio`].
//!
//! # Invariants
//!
//! 1. The ratio is always within `[0.0, 1.0]`.
//! 2. A zero-area target is either fully visible (`1.0`) or not at all (`0.0`).

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping region, or `None` if the rectangles are disjoint.
    ///
    /// Touching edges produce a zero-sized rectangle rather than `None`.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Per-edge adjustment of the observation root, in pixels.
///
/// Positive values grow the root, negative values shrink it. A bottom margin
/// of `-50` means an element must be 50px above the viewport's bottom edge
/// before it counts as visible.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Margin that only moves the bottom edge.
    #[must_use]
    pub const fn bottom(px: f64) -> Self {
        Self {
            bottom: px,
            ..Self::ZERO
        }
    }

    /// CSS shorthand, e.g. `"0px 0px -50px 0px"`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }

    /// Apply the margin to a root rectangle.
    #[must_use]
    pub fn apply(&self, root: Rect) -> Rect {
        Rect::new(
            root.x - self.left,
            root.y - self.top,
            root.width + self.left + self.right,
            root.height + self.top + self.bottom,
        )
    }
}

/// Threshold and margin for one observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible, in `[0.0, 1.0]`.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::ZERO,
        }
    }
}

impl ObserverOptions {
    /// Whether a measured ratio counts as "intersecting" for this observer.
    ///
    /// A zero threshold is satisfied by any overlap at all.
    #[must_use]
    pub fn is_satisfied(&self, ratio: f64) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

/// Fraction of `target` that lies inside `root` after applying `margin`.
#[must_use]
pub fn intersection_ratio(root: Rect, margin: RootMargin, target: Rect) -> f64 {
    let root = margin.apply(root);
    let Some(overlap) = target.intersect(&root) else {
        return 0.0;
    };
    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}
