#![forbid(unsafe_code)]

//! `folio-web` runs the landing-page components against an abstract host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes scroll, resize,
//!   click, intersection and frame events.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   timers fire in deadline order and replay identically for the same input.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate intentionally does not bind to `wasm-bindgen`. The browser
//! binding lives in `folio-wasm`; tests use [`memory::MemoryDocument`] and the
//! [`simulator::Simulator`].

pub mod component;
pub mod components;
pub mod host;
pub mod memory;
pub mod page;
pub mod simulator;
pub mod storage;
pub mod timers;

use core::fmt;
use core::time::Duration;

use folio_core::ConfigError;

pub use component::{Component, Context, Interest, PageEvent};
pub use host::{DomEventKind, Document, ListenTarget, ObserverKey, ScrollBehavior, Surface};
pub use page::{Dispatch, MountReport, Page, StepResult};
pub use storage::{
    MemoryStorage, StorageBackend, StorageError, StorageResult, UnavailableStorage,
};
pub use timers::{TimerId, TimerQueue};

/// Errors surfaced by the page runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// A component could not find an element it needs.
    MissingElement {
        component: &'static str,
        what: String,
    },
    /// The canvas exists but the host cannot draw on it.
    NoSurface { component: &'static str },
    /// `mount` was called on an already mounted page.
    AlreadyMounted,
    Config(ConfigError),
    Storage(StorageError),
    /// Host-specific failure, already rendered to text.
    Host(String),
}

impl PageError {
    /// Shorthand for [`PageError::MissingElement`].
    pub fn missing(component: &'static str, what: impl Into<String>) -> Self {
        Self::MissingElement {
            component,
            what: what.into(),
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement { component, what } => {
                write!(f, "{component}: missing element {what}")
            }
            Self::NoSurface { component } => write!(f, "{component}: canvas has no 2d surface"),
            Self::AlreadyMounted => f.write_str("page already mounted"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Host(msg) => write!(f, "host: {msg}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for PageError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock to `now`. Earlier values are ignored so time never runs
    /// backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        assert_eq!(c.now(), Duration::from_millis(10));

        c.set(Duration::from_millis(4));
        assert_eq!(c.now(), Duration::from_millis(10));

        c.set(Duration::from_millis(25));
        assert_eq!(c.now(), Duration::from_millis(25));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::missing("typewriter", "#typingText");
        assert_eq!(e.to_string(), "typewriter: missing element #typingText");
        let e: PageError = StorageError::Unavailable("private mode".into()).into();
        assert_eq!(e.to_string(), "storage: storage unavailable: private mode");
    }
}
