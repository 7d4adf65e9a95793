//! Painting particle state onto a surface.

use crate::error::SurfaceError;
use crate::particle::Particle;
use crate::surface::Surface;

/// Draw every visible particle as a `pixel_ratio`-sized square.
///
/// One CSS pixel per particle keeps the text weight stable across device
/// pixel ratios. Particles with zero opacity are skipped.
///
/// ## Example
///
/// ```rust
/// use vaporize_text::{Particle, RasterSurface, Rgb, Surface};
/// use vaporize_text::render::render_particles;
///
/// let mut surface = RasterSurface::new();
/// surface.resize(10.0, 10.0, 1.0).unwrap();
///
/// let particles = vec![Particle::new(2.0, 3.0, Rgb::WHITE, 1.0)];
/// render_particles(&mut surface, &particles, 1.0).unwrap();
/// assert_eq!(surface.pixel(2, 3), [255, 255, 255, 255]);
/// ```
pub fn render_particles<S: Surface + ?Sized>(surface: &mut S, particles: &[Particle], pixel_ratio: f64) -> Result<(), SurfaceError> {
    for p in particles.iter().filter(|p| p.opacity > 0.0) {
        surface.fill_rect(p.x, p.y, pixel_ratio, pixel_ratio, p.color, p.opacity)?;
    }
    Ok(())
}

/// Snap particles home and draw them at `fade` (0..1) of their rest opacity.
pub fn render_fade_in<S: Surface + ?Sized>(surface: &mut S, particles: &mut [Particle], pixel_ratio: f64, fade: f64) -> Result<(), SurfaceError> {
    let level = fade.clamp(0.0, 1.0);
    for p in particles.iter_mut() {
        p.snap_to_origin();
        p.opacity = level * p.original_alpha;
    }
    render_particles(surface, particles, pixel_ratio)
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use crate::color::Rgb;
    use crate::surface::{PixelBuffer, TextStyle};
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    /// [`Surface`] backed by an HTML canvas and its 2D context.
    #[derive(Clone, Debug)]
    pub struct CanvasSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        css_width: f64,
        css_height: f64,
    }

    impl CanvasSurface {
        /// Acquire the 2D context of `canvas`.
        pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
            let ctx = canvas
                .get_context("2d")
                .map_err(|_| SurfaceError::ContextUnavailable)?
                .ok_or(SurfaceError::ContextUnavailable)?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| SurfaceError::ContextUnavailable)?;

            Ok(Self {
                canvas: canvas.clone(),
                ctx,
                css_width: 0.0,
                css_height: 0.0,
            })
        }

        pub fn canvas(&self) -> &HtmlCanvasElement {
            &self.canvas
        }

        fn apply_style(&self, style: &TextStyle) {
            self.ctx.set_font(&style.css_font());
            self.ctx.set_fill_style_str(&style.color.css());
            self.ctx.set_text_align(style.alignment.as_str());
            self.ctx.set_text_baseline("middle");
        }
    }

    impl Surface for CanvasSurface {
        fn css_size(&self) -> (f64, f64) {
            (self.css_width, self.css_height)
        }

        fn backing_size(&self) -> (u32, u32) {
            (self.canvas.width(), self.canvas.height())
        }

        fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Result<(), SurfaceError> {
            let (width, height) = crate::sizing::backing_dimensions(css_width, css_height, pixel_ratio);
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            // Display size stays in CSS pixels regardless of the backing store.
            let style = self.canvas.style();
            style
                .set_property("width", &format!("{css_width}px"))
                .map_err(|_| SurfaceError::Raster("set css width".into()))?;
            style
                .set_property("height", &format!("{css_height}px"))
                .map_err(|_| SurfaceError::Raster("set css height".into()))?;

            self.css_width = css_width;
            self.css_height = css_height;
            Ok(())
        }

        fn clear(&mut self) -> Result<(), SurfaceError> {
            let (w, h) = self.backing_size();
            self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
            Ok(())
        }

        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb, alpha: f64) -> Result<(), SurfaceError> {
            self.ctx.set_fill_style_str(&color.css_rgba(alpha));
            self.ctx.fill_rect(x, y, width, height);
            Ok(())
        }

        fn fill_text(&mut self, text: &str, style: &TextStyle, x: f64, y: f64) -> Result<(), SurfaceError> {
            self.apply_style(style);
            self.ctx
                .fill_text(text, x, y)
                .map_err(|_| SurfaceError::Raster("fill_text".into()))
        }

        fn measure_text(&mut self, text: &str, style: &TextStyle) -> Result<f64, SurfaceError> {
            self.apply_style(style);
            let metrics = self
                .ctx
                .measure_text(text)
                .map_err(|_| SurfaceError::Raster("measure_text".into()))?;
            Ok(metrics.width())
        }

        fn read_pixels(&self) -> Result<PixelBuffer, SurfaceError> {
            let (w, h) = self.backing_size();
            if w == 0 || h == 0 {
                return Err(SurfaceError::ZeroSize { width: w, height: h });
            }
            let image = self
                .ctx
                .get_image_data(0.0, 0.0, w as f64, h as f64)
                .map_err(|e| SurfaceError::ReadBack(format!("{e:?}")))?;
            Ok(PixelBuffer::new(w, h, image.data().0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::raster::RasterSurface;

    fn surface() -> RasterSurface {
        let mut s = RasterSurface::new();
        s.resize(20.0, 20.0, 1.5).unwrap();
        s
    }

    #[test]
    fn test_render_skips_invisible() {
        let mut s = surface();
        let mut hidden = Particle::new(1.0, 1.0, Rgb::WHITE, 0.5);
        hidden.opacity = 0.0;
        let shown = Particle::new(10.0, 10.0, Rgb::new(255, 0, 0), 1.0);
        render_particles(&mut s, &[hidden, shown], 1.5).unwrap();

        assert_eq!(s.pixel(1, 1)[3], 0);
        // 1.5px square at (10, 10) covers pixels 10 and 11 on both axes
        assert_eq!(s.painted_pixels(), 4);
        assert_eq!(s.pixel(11, 11), [255, 0, 0, 255]);
    }

    #[test]
    fn test_render_uses_current_position() {
        let mut s = surface();
        let mut p = Particle::new(2.0, 2.0, Rgb::WHITE, 1.0);
        p.x = 20.0;
        p.y = 5.0;
        render_particles(&mut s, &[p], 1.0).unwrap();
        assert_eq!(s.pixel(2, 2)[3], 0);
        assert_eq!(s.pixel(20, 5)[3], 255);
    }

    #[test]
    fn test_fade_in_snaps_and_scales_opacity() {
        let mut s = surface();
        let mut p = Particle::new(4.0, 4.0, Rgb::WHITE, 0.8);
        p.x = 15.0;
        p.y = 1.0;
        p.opacity = 0.0;
        let mut particles = vec![p];

        render_fade_in(&mut s, &mut particles, 1.0, 0.5).unwrap();
        assert_eq!((particles[0].x, particles[0].y), (4.0, 4.0));
        assert!((particles[0].opacity - 0.4).abs() < 1e-9);
        assert_eq!(s.pixel(4, 4)[3], 102);

        render_fade_in(&mut s, &mut particles, 1.0, 3.0).unwrap();
        assert!((particles[0].opacity - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_missing_context_is_error() {
        let mut s = RasterSurface::unavailable();
        let particles = vec![Particle::new(0.0, 0.0, Rgb::WHITE, 1.0)];
        assert_eq!(
            render_particles(&mut s, &particles, 1.0),
            Err(SurfaceError::ContextUnavailable)
        );
    }
}
