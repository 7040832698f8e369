#![forbid(unsafe_code)]

//! Startup options passed from JavaScript.
//!
//! `FolioPage.start(options)` receives an arbitrary JS value. It is
//! serialized with `JSON.stringify` on the JS side of the boundary and parsed
//! here, so everything in this module runs on native targets too.

use folio_core::{ConfigError, PageConfig};
use serde_json::Value;

/// Parse the JSON form of the `start` options.
///
/// `None`, `null` and an empty object all mean "use the defaults". Anything
/// else must deserialize into a valid [`PageConfig`].
pub fn parse_options(json: Option<&str>) -> Result<PageConfig, ConfigError> {
    let Some(json) = json.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(PageConfig::default());
    };
    let value: Value = serde_json::from_str(json)?;
    if value.is_null() {
        return Ok(PageConfig::default());
    }
    let config: PageConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Fill in a particle seed if the options left it open.
///
/// `high` and `low` are uniform samples in `[0, 1)` (from `Math.random`).
pub fn seed_particles(config: &mut PageConfig, high: f64, low: f64) {
    if config.particles.seed.is_none() {
        config.particles.seed = Some(seed_from_unit(high, low));
    }
}

/// Combine two `[0, 1)` samples into a non-zero 64-bit seed.
#[must_use]
pub fn seed_from_unit(high: f64, low: f64) -> u64 {
    let word = |x: f64| (x.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u64;
    ((word(high) << 32) | word(low)).max(1)
}
