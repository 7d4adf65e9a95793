//! Particle data sampled from rasterised glyphs.

use crate::color::Rgb;

/// One sampled pixel of the rasterised text.
///
/// `origin_*`, `color` and `original_alpha` are fixed for the lifetime of a
/// text rendering. Only position, kinematics and opacity change while the
/// particle is simulated.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Current position in backing-store pixels
    pub x: f64,
    pub y: f64,
    /// Position sampled from the glyph bitmap
    pub origin_x: f64,
    pub origin_y: f64,
    pub color: Rgb,
    /// Opacity at rest
    pub original_alpha: f64,
    /// Current opacity
    pub opacity: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub angle: f64,
    pub speed: f64,
    /// Decided on the first frame the frontier reaches this particle
    pub fades_quickly: bool,
    /// Set once the frontier has passed this particle in the current sweep
    pub reached: bool,
}

impl Particle {
    /// Create a particle at rest at its sampled position.
    pub fn new(x: f64, y: f64, color: Rgb, alpha: f64) -> Self {
        Self {
            x,
            y,
            origin_x: x,
            origin_y: y,
            color,
            original_alpha: alpha,
            opacity: alpha,
            velocity_x: 0.0,
            velocity_y: 0.0,
            angle: 0.0,
            speed: 0.0,
            fades_quickly: false,
            reached: false,
        }
    }

    /// Return to the sampled position and opacity, ready for a new sweep.
    pub fn reset(&mut self) {
        self.x = self.origin_x;
        self.y = self.origin_y;
        self.opacity = self.original_alpha;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.angle = 0.0;
        self.speed = 0.0;
        self.fades_quickly = false;
        self.reached = false;
    }

    /// Snap to the sampled position without touching opacity.
    #[inline]
    pub fn snap_to_origin(&mut self) {
        self.x = self.origin_x;
        self.y = self.origin_y;
    }

    /// Distance from the sampled position.
    #[inline]
    pub fn displacement(&self) -> f64 {
        let dx = self.origin_x - self.x;
        let dy = self.origin_y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Horizontal extent of the rasterised text in backing-store pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextBoundary {
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

impl TextBoundary {
    pub fn new(left: f64, width: f64) -> Self {
        Self {
            left,
            right: left + width,
            width,
        }
    }
}

/// Reset every particle for a new dispersal cycle.
pub fn reset_particles(particles: &mut [Particle]) {
    for p in particles.iter_mut() {
        p.reset();
    }
}
