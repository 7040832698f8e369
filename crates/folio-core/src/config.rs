#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every field has a default reproducing the stock landing page, so an empty
//! JSON object is a complete configuration. Hosts pass overrides as JSON
//! (the wasm binding stringifies a JS options object).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `ConfigError::Json` | malformed JSON or wrong field types | nothing is applied |
//! | `ConfigError::Invalid` | value out of range (zero delay, bad threshold) | nothing is applied |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::particles::ParticleParams;
use crate::smooth_scroll::ScrollMode;
use crate::theme;
use crate::typewriter::TypewriterTiming;
use crate::viewport::{ObserverOptions, RootMargin};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while loading a [`PageConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The input was not valid JSON for this schema.
    Json(String),
    /// A field holds a value the page cannot run with.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid config json: {msg}"),
            Self::Invalid { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Where each component finds its elements.
///
/// Fields ending in `_id` are element ids; the rest are CSS selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub typing_text_id: String,
    pub navbar_id: String,
    pub nav_toggle_id: String,
    pub nav_links_id: String,
    pub particle_canvas_id: String,
    pub theme_toggle_id: String,
    /// Links inside the navigation panel.
    pub nav_link: String,
    pub reveal: String,
    pub counter: String,
    pub sections: String,
    pub anchors: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            typing_text_id: "typingText".into(),
            navbar_id: "navbar".into(),
            nav_toggle_id: "navToggle".into(),
            nav_links_id: "navLinks".into(),
            particle_canvas_id: "particleCanvas".into(),
            theme_toggle_id: "themeToggle".into(),
            nav_link: "a".into(),
            reveal: ".reveal".into(),
            counter: ".stat-number".into(),
            sections: ".section, .hero".into(),
            anchors: "a[href^=\"#\"]".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub texts: Vec<String>,
    pub start_delay_ms: u64,
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    pub hold_delay_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            texts: vec![
                "أبني تطبيقات أندرويد احترافية 📱".into(),
                "أصمم مواقع إلكترونية عصرية 🌐".into(),
                "أقدم حلول رقمية مبتكرة 💡".into(),
                "من السودان إلى العالم 🇸🇩".into(),
            ],
            start_delay_ms: 1500,
            type_delay_ms: 80,
            delete_delay_ms: 40,
            hold_delay_ms: 2000,
        }
    }
}

impl TypewriterConfig {
    #[must_use]
    pub fn timing(&self) -> TypewriterTiming {
        TypewriterTiming {
            start_delay: Duration::from_millis(self.start_delay_ms),
            type_delay: Duration::from_millis(self.type_delay_ms),
            delete_delay: Duration::from_millis(self.delete_delay_ms),
            hold_delay: Duration::from_millis(self.hold_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Scroll offset past which the navbar is styled as scrolled.
    pub scrolled_after: f64,
    pub scrolled_class: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            scrolled_after: 50.0,
            scrolled_class: "scrolled".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSpyConfig {
    /// A section becomes current this many pixels before its top.
    pub offset: f64,
    pub highlight_color: String,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            offset: 100.0,
            highlight_color: "#00d4ff".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavToggleConfig {
    pub active_class: String,
}

impl Default for NavToggleConfig {
    fn default() -> Self {
        Self {
            active_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub observer: ObserverOptions,
    pub active_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            observer: ObserverOptions {
                threshold: 0.1,
                root_margin: RootMargin::bottom(-50.0),
            },
            active_class: "active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub observer: ObserverOptions,
    /// Attribute holding the numeric target.
    pub attribute: String,
    pub steps: u32,
    pub interval_ms: u64,
    pub suffix: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            observer: ObserverOptions {
                threshold: 0.5,
                root_margin: RootMargin::ZERO,
            },
            attribute: "data-count".into(),
            steps: 40,
            interval_ms: 50,
            suffix: "+".into(),
        }
    }
}

impl CounterConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollConfig {
    pub mode: ScrollMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: theme::STORAGE_KEY.into(),
            attribute: theme::THEME_ATTRIBUTE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PageConfig
// ---------------------------------------------------------------------------

/// Complete configuration for one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub typewriter: TypewriterConfig,
    pub navbar: NavbarConfig,
    pub scroll_spy: ScrollSpyConfig,
    pub nav_toggle: NavToggleConfig,
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub particles: ParticleParams,
    pub smooth_scroll: SmoothScrollConfig,
    pub theme: ThemeConfig,
    /// Fail page startup when a component cannot find its elements instead
    /// of disabling just that component.
    pub strict: bool,
}

impl PageConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the runtime cannot tolerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        // Zero-length repeating timers would never let the clock move on.
        if self.typewriter.type_delay_ms == 0 {
            return invalid("typewriter.type_delay_ms", "must be positive");
        }
        if self.typewriter.delete_delay_ms == 0 {
            return invalid("typewriter.delete_delay_ms", "must be positive");
        }
        if self.counter.interval_ms == 0 {
            return invalid("counter.interval_ms", "must be positive");
        }
        if self.counter.steps == 0 {
            return invalid("counter.steps", "must be positive");
        }
        for (field, threshold) in [
            ("reveal.observer.threshold", self.reveal.observer.threshold),
            ("counter.observer.threshold", self.counter.observer.threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return invalid(field, "must be within [0, 1]");
            }
        }

        let p = &self.particles;
        if p.size_min > p.size_max {
            return invalid("particles.size_min", "must not exceed size_max");
        }
        if p.opacity_min > p.opacity_max {
            return invalid("particles.opacity_min", "must not exceed opacity_max");
        }
        if p.link_distance.is_nan() || p.link_distance <= 0.0 {
            return invalid("particles.link_distance", "must be positive");
        }
        if p.max_speed.is_nan() || p.max_speed < 0.0 {
            return invalid("particles.max_speed", "must not be negative");
        }
        Ok(())
    }
}
