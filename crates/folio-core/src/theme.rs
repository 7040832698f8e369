#![forbid(unsafe_code)]

//! Light/dark theme preference.
//!
//! Dark is the baseline and carries no attribute on the document root; light
//! is expressed as `data-theme="light"`. The stored preference is read once
//! at startup and anything other than `"light"` means dark.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key holding the preference.
pub const STORAGE_KEY: &str = "theme";

/// Root attribute carrying the non-default theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Interpret a stored preference. Missing or unknown values mean dark.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Interpret the root attribute value.
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        Self::from_stored(value)
    }

    /// Value written to storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Root attribute value, `None` meaning "remove the attribute".
    #[must_use]
    pub const fn attribute_value(self) -> Option<&'static str> {
        match self {
            Self::Light => Some("light"),
            Self::Dark => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_unknown_means_dark() {
        assert_eq!(Theme::from_stored(None), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("LIGHT")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
    }

    #[test]
    fn toggle_alternates() {
        let t = Theme::default();
        assert_eq!(t, Theme::Dark);
        assert_eq!(t.toggled(), Theme::Light);
        assert_eq!(t.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn dark_has_no_attribute() {
        assert_eq!(Theme::Dark.attribute_value(), None);
        assert_eq!(Theme::Light.attribute_value(), Some("light"));
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        let t: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(t, Theme::Dark);
    }
}
