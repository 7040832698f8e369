#![forbid(unsafe_code)]

//! In-page anchor navigation math.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the page moves to an anchor target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollMode {
    /// Let the host scroll smoothly on its own.
    #[default]
    Native,
    /// Drive an eased scroll from the frame loop.
    Tween { duration_ms: u64 },
}

impl ScrollMode {
    #[must_use]
    pub fn tween_duration(&self) -> Option<Duration> {
        match self {
            Self::Native => None,
            Self::Tween { duration_ms } => Some(Duration::from_millis(*duration_ms)),
        }
    }
}

/// Element id named by an in-page `href`.
///
/// `"#about"` yields `Some("about")`. A bare `"#"`, or anything not starting
/// with `#`, yields `None`.
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll offset that puts `target_top` just below a fixed header.
#[inline]
#[must_use]
pub fn destination(target_top: f64, header_height: f64) -> f64 {
    target_top - header_height
}
