#![forbid(unsafe_code)]

//! Count-up animation for stat numbers.
//!
//! A [`CountUp`] moves a local counter from zero toward a target in equal
//! increments (`target / steps`). Each tick yields the text to display:
//! `ceil(counter)` plus a suffix while below the target, then exactly the
//! target plus the suffix once reached, after which the animation is done.
//!
//! # Invariants
//!
//! 1. For non-negative targets the displayed number never decreases.
//! 2. The final frame shows exactly the target.
//! 3. A zero target finishes on the first tick.
//! 4. Ticking after completion keeps returning the final frame.

use std::fmt;

/// Failure to read a counter target from markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterTargetError {
    raw: String,
}

impl CounterTargetError {
    /// The attribute value that failed to parse.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for CounterTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "counter target {:?} is not a finite number", self.raw)
    }
}

impl std::error::Error for CounterTargetError {}

/// Parse a counter target attribute.
///
/// Surrounding whitespace is ignored and a blank value reads as zero, the
/// same way numeric coercion treats it in markup-driven pages.
pub fn parse_target(raw: &str) -> Result<f64, CounterTargetError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CounterTargetError {
            raw: raw.to_string(),
        }),
    }
}

/// Render a number the way the page shows it: integers without a fraction.
#[must_use]
pub fn format_count(value: f64) -> String {
    // Avoid "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One rendered counter frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterFrame {
    pub text: String,
    pub finished: bool,
}

/// Count-up state for a single stat element.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    target: f64,
    current: f64,
    increment: f64,
    suffix: String,
    finished: bool,
}

impl CountUp {
    /// Count toward `target` in `steps` equal increments.
    ///
    /// `steps` of zero is treated as one.
    #[must_use]
    pub fn new(target: f64, steps: u32, suffix: impl Into<String>) -> Self {
        Self {
            target,
            current: 0.0,
            increment: target / f64::from(steps.max(1)),
            suffix: suffix.into(),
            finished: false,
        }
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one increment and return the frame to display.
    pub fn tick(&mut self) -> CounterFrame {
        if !self.finished {
            self.current += self.increment;
            if self.current >= self.target {
                self.finished = true;
            }
        }

        let shown = if self.finished {
            self.target
        } else {
            self.current.ceil()
        };
        CounterFrame {
            text: format!("{}{}", format_count(shown), self.suffix),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(c: &mut CountUp) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            let frame = c.tick();
            out.push(frame.text);
            if frame.finished {
                return out;
            }
            assert!(out.len() < 10_000, "count-up never finished");
        }
    }

    #[test]
    fn hundred_takes_forty_ticks_and_ends_exactly() {
        let mut c = CountUp::new(100.0, 40, "+");
        let frames = drain(&mut c);
        assert_eq!(frames.len(), 40);
        assert_eq!(frames[0], "3+");
        assert_eq!(frames.last().map(String::as_str), Some("100+"));
    }

    #[test]
    fn display_never_decreases() {
        let mut c = CountUp::new(37.0, 40, "+");
        let values: Vec<i64> = drain(&mut c)
            .iter()
            .map(|s| s.trim_end_matches('+').parse().unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 37);
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut c = CountUp::new(0.0, 40, "+");
        let frame = c.tick();
        assert_eq!(
            frame,
            CounterFrame {
                text: "0+".to_string(),
                finished: true
            }
        );
    }

    #[test]
    fn ticking_after_finish_is_stable() {
        let mut c = CountUp::new(5.0, 2, "");
        drain(&mut c);
        assert_eq!(c.tick().text, "5");
        assert!(c.is_finished());
    }

    #[test]
    fn parse_accepts_numbers_and_blank() {
        assert_eq!(parse_target("150"), Ok(150.0));
        assert_eq!(parse_target(" 12 "), Ok(12.0));
        assert_eq!(parse_target("2.5"), Ok(2.5));
        assert_eq!(parse_target(""), Ok(0.0));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_target("lots").unwrap_err();
        assert_eq!(err.raw(), "lots");
        assert!(parse_target("inf").is_err());
        assert!(parse_target("NaN").is_err());
    }

    #[test]
    fn format_drops_integer_fraction() {
        assert_eq!(format_count(42.0), "42");
        assert_eq!(format_count(2.5), "2.5");
        assert_eq!(format_count(-0.0), "0");
    }
}
