//! Glyph sampling: turn a string into particle seeds.

use crate::color::Rgb;
use crate::config::{Alignment, FontDescriptor};
use crate::error::SurfaceError;
use crate::particle::{Particle, TextBoundary};
use crate::sizing::{sample_coverage, sample_step};
use crate::surface::{Surface, TextStyle};

/// Particles and text extent produced by one sampling pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampledText {
    pub particles: Vec<Particle>,
    pub boundary: TextBoundary,
}

impl SampledText {
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Rasterises text on a surface and samples its pixels into particles.
///
/// ## Example
///
/// ```rust
/// use vaporize_text::{FontDescriptor, GlyphSampler, RasterSurface, Rgb, Alignment};
///
/// let sampler = GlyphSampler::new(FontDescriptor::default(), Rgb::WHITE, Alignment::Center, 1.5);
/// let mut surface = RasterSurface::new();
/// let sampled = sampler.sample(&mut surface, "Hi", 200.0, 80.0).unwrap();
///
/// assert!(!sampled.particles.is_empty());
/// assert!(sampled.boundary.width > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphSampler {
    pub font: FontDescriptor,
    pub color: Rgb,
    pub alignment: Alignment,
    /// Backing-store pixels per CSS pixel
    pub pixel_ratio: f64,
}

impl GlyphSampler {
    pub fn new(font: FontDescriptor, color: Rgb, alignment: Alignment, pixel_ratio: f64) -> Self {
        Self {
            font,
            color,
            alignment,
            pixel_ratio,
        }
    }

    /// Style the text is drawn with on the backing store.
    pub fn text_style(&self) -> TextStyle {
        TextStyle::scaled(&self.font, self.pixel_ratio, self.color, self.alignment)
    }

    /// Resize `surface` to the CSS size, draw `text` once and sample it.
    ///
    /// The surface is left cleared: only the particles are ever shown. A
    /// surface with no width (not laid out yet) yields no particles and is
    /// left untouched.
    pub fn sample<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        css_width: f64,
        css_height: f64,
    ) -> Result<SampledText, SurfaceError> {
        if css_width.is_nan() || css_width <= 0.0 {
            log::debug!("surface has no width yet, skipping sampling of {text:?}");
            return Ok(SampledText::default());
        }

        surface.resize(css_width, css_height, self.pixel_ratio)?;
        let (width, height) = surface.backing_size();
        if width == 0 || height == 0 {
            return Ok(SampledText::default());
        }

        let style = self.text_style();
        let anchor_x = match self.alignment {
            Alignment::Center => width as f64 / 2.0,
            Alignment::Left => 0.0,
            Alignment::Right => width as f64,
        };
        let anchor_y = height as f64 / 2.0;

        surface.clear()?;
        let text_width = surface.measure_text(text, &style)?;
        let left = match self.alignment {
            Alignment::Center => anchor_x - text_width / 2.0,
            Alignment::Left => anchor_x,
            Alignment::Right => anchor_x - text_width,
        };
        let boundary = TextBoundary::new(left, text_width);

        surface.fill_text(text, &style, anchor_x, anchor_y)?;
        let pixels = surface.read_pixels()?;

        let step = sample_step(width, css_width);
        let coverage = sample_coverage(step, width, css_width);
        let mut particles = Vec::new();
        for y in (0..pixels.height).step_by(step as usize) {
            for x in (0..pixels.width).step_by(step as usize) {
                let Some([r, g, b, a]) = pixels.rgba_at(x, y) else {
                    continue;
                };
                if a > 0 {
                    let alpha = (a as f64 / 255.0) * coverage;
                    particles.push(Particle::new(x as f64, y as f64, Rgb::new(r, g, b), alpha));
                }
            }
        }

        surface.clear()?;
        log::debug!(
            "sampled {} particles for {text:?} (step {step}, boundary {:.1}..{:.1})",
            particles.len(),
            boundary.left,
            boundary.right
        );
        Ok(SampledText { particles, boundary })
    }
}
