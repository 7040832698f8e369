#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations produce normalized `f64` values in `[0.0, 1.0]` and are advanced
//! explicitly with [`Animation::tick`]. They never read a clock themselves;
//! the host-driven runtime passes the elapsed time.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f64;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, shaped by an easing function.
///
/// Elapsed time is accumulated as a [`Duration`] so long runs do not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    ///
    /// A zero duration is bumped to one nanosecond so the first tick completes.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    #[must_use]
    pub fn raw_progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// ScrollTween
// ---------------------------------------------------------------------------

/// Interpolates a vertical scroll offset from `from` to `to`.
///
/// Used when the host cannot scroll smoothly on its own; the runtime feeds
/// frame deltas and writes [`ScrollTween::position`] back to the document.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTween {
    from: f64,
    to: f64,
    fade: Fade,
}

impl ScrollTween {
    /// Tween between two offsets over `duration` with ease-in-out.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            fade: Fade::new(duration).easing(ease_in_out),
        }
    }

    /// Current interpolated offset. Exactly `to` once complete.
    #[must_use]
    pub fn position(&self) -> f64 {
        if self.fade.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.fade.value()
    }
}

impl Animation for ScrollTween {
    fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.fade.is_complete()
    }

    fn value(&self) -> f64 {
        self.fade.value()
    }

    fn reset(&mut self) {
        self.fade.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
