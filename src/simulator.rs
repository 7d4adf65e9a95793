//! Per-particle dispersal physics.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{Direction, VaporizeConfig};
use crate::particle::Particle;

/// Opacity at or below which a particle counts as fully vaporised.
pub const FADED_THRESHOLD: f64 = 0.01;

/// Horizontal displacement scale per unit velocity and second.
const DRIFT_SCALE_X: f64 = 20.0;
/// Vertical displacement scale, half the horizontal one for a sideways blow.
const DRIFT_SCALE_Y: f64 = 10.0;
/// Lowest damping applied to a drifting particle's velocity.
const DAMPING_FLOOR: f64 = 0.95;
/// Pull back towards the sampled position per pixel of displacement.
const RESTORING_PULL: f64 = 0.002;

/// Where the dispersal sweep currently is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frontier {
    /// The sweep is at this x coordinate in backing-store pixels
    At(f64),
    /// The sweep has crossed the whole text: every particle is reached
    Exhausted,
}

impl Frontier {
    /// Whether a particle sampled at `origin_x` is behind the frontier.
    #[inline]
    pub fn reaches(&self, origin_x: f64, direction: Direction) -> bool {
        match (self, direction) {
            (Frontier::Exhausted, _) => true,
            (Frontier::At(x), Direction::LeftToRight) => origin_x <= *x,
            (Frontier::At(x), Direction::RightToLeft) => origin_x >= *x,
        }
    }
}

/// Tunables for one dispersal cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispersalParams {
    /// Spread already scaled for the font size
    pub spread: f64,
    /// Sweep duration in milliseconds
    pub duration_ms: f64,
    pub direction: Direction,
    /// Probability that a reached particle drifts instead of fading instantly
    pub density: f64,
}

impl DispersalParams {
    pub fn from_config(config: &VaporizeConfig) -> Self {
        Self {
            spread: config.effective_spread(),
            duration_ms: config.animation.vaporize_ms(),
            direction: config.direction,
            density: config.density_fraction(),
        }
    }

    // Opacity lost per second by drifting particles.
    fn drift_fade_rate(&self) -> f64 {
        0.25 * (2000.0 / self.duration_ms)
    }
}

/// Advances particles through the dispersal state machine.
///
/// Unreached particles are untouched. On the first step that reaches a
/// particle it gets a random heading, speed and fade behaviour; afterwards it
/// either fades in place or drifts with jitter, a weak pull towards home and
/// a speed cap.
///
/// ```rust
/// use vaporize_text::{DispersalParams, Direction, Frontier, Particle, ParticleSimulator, Rgb};
///
/// let params = DispersalParams { spread: 2.5, duration_ms: 2000.0, direction: Direction::LeftToRight, density: 0.65 };
/// let mut sim = ParticleSimulator::with_seed(params, 7);
/// let mut particles = vec![Particle::new(10.0, 5.0, Rgb::WHITE, 0.6)];
///
/// // frontier has not reached x=10 yet
/// assert!(!sim.step(&mut particles, Frontier::At(5.0), 0.016));
/// assert!(!particles[0].reached);
///
/// sim.step(&mut particles, Frontier::At(20.0), 0.016);
/// assert!(particles[0].reached);
/// ```
#[derive(Clone, Debug)]
pub struct ParticleSimulator {
    params: DispersalParams,
    rng: SmallRng,
}

impl ParticleSimulator {
    /// Create a simulator seeded from the host clock.
    pub fn new(params: DispersalParams) -> Self {
        Self::with_seed(params, default_seed())
    }

    /// Create a simulator with a fixed seed for reproducible runs.
    pub fn with_seed(params: DispersalParams, seed: u64) -> Self {
        Self {
            params,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &DispersalParams {
        &self.params
    }

    pub fn set_params(&mut self, params: DispersalParams) {
        self.params = params;
    }

    /// Advance every particle by `dt` seconds against `frontier`.
    ///
    /// Returns `true` when every particle has been reached and faded. An
    /// empty slice is trivially complete.
    pub fn step(&mut self, particles: &mut [Particle], frontier: Frontier, dt: f64) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut all_faded = true;

        for p in particles.iter_mut() {
            if !frontier.reaches(p.origin_x, self.params.direction) {
                all_faded = false;
                continue;
            }

            if !p.reached {
                self.launch(p);
            }

            if p.fades_quickly {
                p.opacity = (p.opacity - dt).max(0.0);
            } else {
                self.drift(p, dt);
            }

            if p.opacity > FADED_THRESHOLD {
                all_faded = false;
            }
        }

        all_faded
    }

    fn launch(&mut self, p: &mut Particle) {
        let spread = self.params.spread;
        p.reached = true;
        p.angle = self.rng.random::<f64>() * TAU;
        p.speed = (self.rng.random::<f64>() + 0.5) * spread;
        p.velocity_x = p.angle.cos() * p.speed;
        p.velocity_y = p.angle.sin() * p.speed;
        p.fades_quickly = self.rng.random::<f64>() > self.params.density;
    }

    fn drift(&mut self, p: &mut Particle, dt: f64) {
        let spread = self.params.spread;
        let dx = p.origin_x - p.x;
        let dy = p.origin_y - p.y;
        let distance = (dx * dx + dy * dy).sqrt();

        // Damping stays within [0.95, 1]; farther particles are slowed more.
        let damping = if spread > 0.0 {
            (1.0 - distance / (100.0 * spread)).max(DAMPING_FLOOR)
        } else {
            DAMPING_FLOOR
        };

        let jitter_x = (self.rng.random::<f64>() - 0.5) * spread * 3.0;
        let jitter_y = (self.rng.random::<f64>() - 0.5) * spread * 3.0;
        p.velocity_x = (p.velocity_x + jitter_x + dx * RESTORING_PULL) * damping;
        p.velocity_y = (p.velocity_y + jitter_y + dy * RESTORING_PULL) * damping;

        let max_speed = spread * 2.0;
        let speed = (p.velocity_x * p.velocity_x + p.velocity_y * p.velocity_y).sqrt();
        if speed > max_speed && speed > 0.0 {
            let scale = max_speed / speed;
            p.velocity_x *= scale;
            p.velocity_y *= scale;
        }

        p.x += p.velocity_x * dt * DRIFT_SCALE_X;
        p.y += p.velocity_y * dt * DRIFT_SCALE_Y;
        p.opacity = (p.opacity - dt * self.params.drift_fade_rate()).max(0.0);
    }
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
fn default_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn default_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

#[cfg(all(not(feature = "web"), target_arch = "wasm32"))]
fn default_seed() -> u64 {
    0x5EED
}
