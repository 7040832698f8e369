#![forbid(unsafe_code)]

//! Decorative particle field.
//!
//! A fixed pool of points drifts across a rectangle, bouncing off its edges.
//! Pairs of points closer than `link_distance` are joined by a line whose
//! opacity falls off linearly with distance.
//!
//! # Invariants
//!
//! 1. The pool size never changes after construction.
//! 2. Movement is `position += velocity`, never clamped: a particle may
//!    overshoot an edge by at most one frame's velocity.
//! 3. A velocity axis is inverted only while the particle is outside the
//!    field on that axis *and* still moving outward, so each contact flips
//!    the sign exactly once.
//! 4. Link opacity is `link_alpha * (1 - d / link_distance)` for
//!    `d < link_distance` and there is no link otherwise.
//!
//! # Cost
//!
//! Linking is a full pairwise pass: `n * (n - 1) / 2` distance checks per
//! frame (3160 for the default 80 particles). Pools larger than
//! [`COMFORT_POOL_LIMIT`] log a warning; anything much bigger needs spatial
//! partitioning rather than a bigger number here.

use serde::{Deserialize, Serialize};

/// Pool size above which the pairwise link pass is flagged.
pub const COMFORT_POOL_LIMIT: usize = 150;

/// Opaque RGB color for dots and links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgba(...)` string with the given alpha.
    #[must_use]
    pub fn css_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Tunables for the field. Defaults match the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    pub count: usize,
    pub size_min: f64,
    pub size_max: f64,
    /// Maximum absolute velocity per axis, in pixels per frame.
    pub max_speed: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    pub link_distance: f64,
    pub link_alpha: f64,
    pub link_width: f64,
    pub color: Rgb,
    /// Fixed RNG seed; `None` lets the host pick one.
    pub seed: Option<u64>,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 80,
            size_min: 0.5,
            size_max: 2.5,
            max_speed: 0.25,
            opacity_min: 0.1,
            opacity_max: 0.6,
            link_distance: 120.0,
            link_alpha: 0.05,
            link_width: 0.5,
            color: Rgb::new(0, 212, 255),
            seed: None,
        }
    }
}

impl ParticleParams {
    /// Distance checks performed per frame by the link pass.
    #[must_use]
    pub fn pair_checks(&self) -> usize {
        self.count * self.count.saturating_sub(1) / 2
    }
}

// ---------------------------------------------------------------------------
// RNG
// ---------------------------------------------------------------------------

/// Small xorshift64 generator; deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        let state = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// Which velocity axes were inverted during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
}

impl Particle {
    /// Random particle inside a `width` x `height` field.
    pub fn random(rng: &mut XorShift64, params: &ParticleParams, width: f64, height: f64) -> Self {
        let mut p = Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 0.0,
            opacity: 0.0,
        };
        p.reset(rng, params, width, height);
        p
    }

    /// Re-randomize every attribute.
    pub fn reset(
        &mut self,
        rng: &mut XorShift64,
        params: &ParticleParams,
        width: f64,
        height: f64,
    ) {
        self.x = rng.next_f64() * width;
        self.y = rng.next_f64() * height;
        self.size = rng.range(params.size_min, params.size_max);
        self.vx = rng.range(-params.max_speed, params.max_speed);
        self.vy = rng.range(-params.max_speed, params.max_speed);
        self.opacity = rng.range(params.opacity_min, params.opacity_max);
    }

    /// Move one frame and reflect off the field edges.
    pub fn advance(&mut self, width: f64, height: f64) -> Bounce {
        self.x += self.vx;
        self.y += self.vy;

        let mut bounce = Bounce::default();
        if (self.x < 0.0 && self.vx < 0.0) || (self.x > width && self.vx > 0.0) {
            self.vx = -self.vx;
            bounce.x = true;
        }
        if (self.y < 0.0 && self.vy < 0.0) || (self.y > height && self.vy > 0.0) {
            self.vy = -self.vy;
            bounce.y = true;
        }
        bounce
    }

    #[must_use]
    pub fn distance(&self, other: &Particle) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Opacity of the line joining two particles `distance` apart, if any.
#[inline]
#[must_use]
pub fn link_opacity(distance: f64, link_distance: f64, link_alpha: f64) -> Option<f64> {
    if distance < link_distance {
        Some(link_alpha * (1.0 - distance / link_distance))
    } else {
        None
    }
}

/// A proximity link between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub opacity: f64,
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ParticleField {
    params: ParticleParams,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    rng: XorShift64,
}

impl ParticleField {
    /// Populate a field of `params.count` particles.
    ///
    /// `seed` is used when `params.seed` is unset.
    pub fn new(params: ParticleParams, width: f64, height: f64, seed: u64) -> Self {
        if params.count > COMFORT_POOL_LIMIT {
            crate::warn!(
                count = params.count,
                pair_checks = params.pair_checks(),
                "particle pool exceeds the pairwise link comfort limit"
            );
        }
        let mut rng = XorShift64::new(params.seed.unwrap_or(seed));
        let particles = (0..params.count)
            .map(|_| Particle::random(&mut rng, &params, width, height))
            .collect();
        Self {
            params,
            particles,
            width,
            height,
            rng,
        }
    }

    #[must_use]
    pub const fn params(&self) -> &ParticleParams {
        &self.params
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Track a new field size. Particles keep their positions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Re-randomize one particle within the current bounds.
    pub fn reset_particle(&mut self, index: usize) {
        if let Some(p) = self.particles.get_mut(index) {
            p.reset(&mut self.rng, &self.params, self.width, self.height);
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.advance(w, h);
        }
    }

    /// All proximity links for the current positions.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let n = self.particles.len();
        let max = self.params.link_distance;
        let alpha = self.params.link_alpha;
        (0..n).flat_map(move |a| {
            (a + 1..n).filter_map(move |b| {
                let distance = self.particles[a].distance(&self.particles[b]);
                link_opacity(distance, max, alpha).map(|opacity| Link {
                    a,
                    b,
                    distance,
                    opacity,
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f64, y: f64) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 1.0,
            opacity: 0.5,
        }
    }

    #[test]
    fn half_threshold_opacity() {
        let o = link_opacity(60.0, 120.0, 0.05).unwrap();
        assert!((o - 0.025).abs() < 1e-12);
    }

    #[test]
    fn no_link_at_or_beyond_threshold() {
        assert_eq!(link_opacity(120.0, 120.0, 0.05), None);
        assert_eq!(link_opacity(500.0, 120.0, 0.05), None);
        assert_eq!(link_opacity(0.0, 120.0, 0.05), Some(0.05));
    }

    #[test]
    fn left_edge_contact_flips_once() {
        let mut p = Particle {
            vx: -0.2,
            ..still(0.1, 50.0)
        };
        let first = p.advance(100.0, 100.0);
        assert!(first.x);
        assert!((p.x - -0.1).abs() < 1e-12, "position is not clamped");
        assert_eq!(p.vx, 0.2);

        let second = p.advance(100.0, 100.0);
        assert!(!second.x);
        assert!(p.x > 0.0);
        assert_eq!(p.vx, 0.2);
    }

    #[test]
    fn bottom_edge_contact_flips_once() {
        let mut p = Particle {
            vy: 0.25,
            ..still(50.0, 99.9)
        };
        assert!(p.advance(100.0, 100.0).y);
        assert_eq!(p.vy, -0.25);
        assert!(!p.advance(100.0, 100.0).y);
    }

    #[test]
    fn particle_outside_after_shrink_heads_back() {
        let mut p = Particle {
            vx: -0.1,
            ..still(500.0, 10.0)
        };
        // Already moving inward: no flip, it drifts back in.
        for _ in 0..10 {
            assert!(!p.advance(100.0, 100.0).x);
        }
        assert!(p.x < 500.0);
    }

    #[test]
    fn field_respects_param_ranges() {
        let params = ParticleParams::default();
        let field = ParticleField::new(params.clone(), 800.0, 600.0, 7);
        assert_eq!(field.particles().len(), 80);
        for p in field.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!((params.size_min..params.size_max).contains(&p.size));
            assert!((-0.25..0.25).contains(&p.vx));
            assert!((-0.25..0.25).contains(&p.vy));
            assert!((params.opacity_min..params.opacity_max).contains(&p.opacity));
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::new(ParticleParams::default(), 300.0, 300.0, 42);
        let b = ParticleField::new(ParticleParams::default(), 300.0, 300.0, 42);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn params_seed_overrides_host_seed() {
        let params = ParticleParams {
            seed: Some(9),
            ..ParticleParams::default()
        };
        let a = ParticleField::new(params.clone(), 300.0, 300.0, 1);
        let b = ParticleField::new(params, 300.0, 300.0, 2);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn links_cover_each_close_pair_once() {
        let params = ParticleParams {
            count: 3,
            ..ParticleParams::default()
        };
        let mut field = ParticleField::new(params, 1000.0, 1000.0, 3);
        let ps = field.particles_mut();
        ps[0] = still(0.0, 0.0);
        ps[1] = still(60.0, 0.0);
        ps[2] = still(600.0, 600.0);
        let links: Vec<Link> = field.links().collect();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].opacity - 0.025).abs() < 1e-12);
    }

    #[test]
    fn pair_checks_for_default_pool() {
        assert_eq!(ParticleParams::default().pair_checks(), 3160);
    }

    #[test]
    fn resize_keeps_positions() {
        let mut field = ParticleField::new(ParticleParams::default(), 400.0, 400.0, 5);
        let before = field.particles().to_vec();
        field.resize(100.0, 100.0);
        assert_eq!(field.size(), (100.0, 100.0));
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn reset_particle_stays_in_bounds() {
        let mut field = ParticleField::new(ParticleParams::default(), 400.0, 400.0, 5);
        field.resize(50.0, 20.0);
        field.reset_particle(3);
        let p = field.particles()[3];
        assert!((0.0..50.0).contains(&p.x));
        assert!((0.0..20.0).contains(&p.y));
    }

    #[test]
    fn css_rgba_formatting() {
        assert_eq!(Rgb::new(0, 212, 255).css_rgba(0.025), "rgba(0, 212, 255, 0.025)");
    }
}
