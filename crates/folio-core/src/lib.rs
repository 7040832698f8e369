#![forbid(unsafe_code)]

//! Core: host-independent state machines for the folio landing page.
//!
//! Nothing in this crate touches a DOM, a canvas or a clock. Every type is
//! driven explicitly by its caller (tick, step, scroll position), which keeps
//! the behavior deterministic and testable on any target.

pub mod animation;
pub mod config;
pub mod counter;
pub mod logging;
pub mod particles;
pub mod scroll;
pub mod smooth_scroll;
pub mod theme;
pub mod typewriter;
pub mod viewport;

pub use config::{ConfigError, PageConfig};
pub use theme::Theme;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
