//! Software raster surface.
//!
//! `RasterSurface` implements [`Surface`] over an in-memory RGBA buffer. It has
//! no font engine: glyphs are drawn as solid ink blocks on a monospace grid,
//! which is enough to drive the whole animation deterministically outside a
//! browser (tests, headless previews, terminal hosts).

use crate::color::Rgb;
use crate::config::Alignment;
use crate::error::SurfaceError;
use crate::sizing::backing_dimensions;
use crate::surface::{PixelBuffer, Surface, TextStyle};

/// Monospace block-glyph metrics as ratios of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMetrics {
    /// Horizontal advance per character (typically 0.6 for monospace)
    pub advance_ratio: f64,
    /// Height of the ink block, centred on the anchor line
    pub ink_height_ratio: f64,
    /// Blank margin on each side of the ink block
    pub ink_inset_ratio: f64,
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            ink_height_ratio: 0.7,
            ink_inset_ratio: 0.1,
        }
    }
}

impl BlockMetrics {
    /// Advance width of a single character.
    #[inline]
    pub fn advance(&self, font_size: f64) -> f64 {
        font_size * self.advance_ratio
    }

    /// Width of `text` at `font_size`.
    #[inline]
    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.advance(font_size)
    }
}

/// In-memory RGBA surface.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    css_width: f64,
    css_height: f64,
    width: u32,
    height: u32,
    data: Vec<u8>,
    metrics: BlockMetrics,
    available: bool,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    /// Create a zero-sized surface. Call [`Surface::resize`] before drawing.
    pub fn new() -> Self {
        Self {
            css_width: 0.0,
            css_height: 0.0,
            width: 0,
            height: 0,
            data: Vec::new(),
            metrics: BlockMetrics::default(),
            available: true,
        }
    }

    /// Create a surface whose context can never be acquired.
    ///
    /// Every operation fails with [`SurfaceError::ContextUnavailable`].
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Use custom glyph metrics.
    pub fn with_metrics(mut self, metrics: BlockMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> BlockMetrics {
        self.metrics
    }

    /// RGBA at a pixel, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = self.index(x, y);
        [self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3]]
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.available {
            Ok(())
        } else {
            Err(SurfaceError::ContextUnavailable)
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    // Pixel span covered by [start, end), clipped to `limit`.
    fn span(start: f64, end: f64, limit: u32) -> Option<(u32, u32)> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return None;
        }
        let lo = start.floor().max(0.0);
        let hi = end.ceil().min(limit as f64);
        if hi <= lo {
            return None;
        }
        Some((lo as u32, hi as u32))
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgb, alpha: f64) {
        let idx = self.index(x, y);
        let src_a = alpha;
        let dst_a = self.data[idx + 3] as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| -> u8 {
            let v = (src as f64 * src_a + dst as f64 * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.data[idx] = mix(color.r, self.data[idx]);
        self.data[idx + 1] = mix(color.g, self.data[idx + 1]);
        self.data[idx + 2] = mix(color.b, self.data[idx + 2]);
        self.data[idx + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

impl Surface for RasterSurface {
    fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Result<(), SurfaceError> {
        self.check()?;
        let (width, height) = backing_dimensions(css_width, css_height, pixel_ratio);
        self.css_width = css_width;
        self.css_height = css_height;
        self.width = width;
        self.height = height;
        self.data = vec![0; width as usize * height as usize * 4];
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.check()?;
        self.data.fill(0);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb, alpha: f64) -> Result<(), SurfaceError> {
        self.check()?;
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        if alpha == 0.0 {
            return Ok(());
        }
        let Some((x0, x1)) = Self::span(x, x + width, self.width) else {
            return Ok(());
        };
        let Some((y0, y1)) = Self::span(y, y + height, self.height) else {
            return Ok(());
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, alpha);
            }
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, style: &TextStyle, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.check()?;
        let size = style.size_px;
        let advance = self.metrics.advance(size);
        let inset = size * self.metrics.ink_inset_ratio;
        let ink_height = size * self.metrics.ink_height_ratio;
        let width = self.metrics.text_width(text, size);
        let left = match style.alignment {
            Alignment::Left => x,
            Alignment::Center => x - width / 2.0,
            Alignment::Right => x - width,
        };

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cell = left + i as f64 * advance;
            self.fill_rect(
                cell + inset,
                y - ink_height / 2.0,
                advance - 2.0 * inset,
                ink_height,
                style.color,
                1.0,
            )?;
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> Result<f64, SurfaceError> {
        self.check()?;
        Ok(self.metrics.text_width(text, style.size_px))
    }

    fn read_pixels(&self) -> Result<PixelBuffer, SurfaceError> {
        self.check()?;
        Ok(PixelBuffer::new(self.width, self.height, self.data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontDescriptor;

    fn style(size: f64, alignment: Alignment) -> TextStyle {
        let font = FontDescriptor {
            size_px: size,
            ..Default::default()
        };
        TextStyle::scaled(&font, 1.0, Rgb::new(255, 0, 0), alignment)
    }

    #[test]
    fn test_resize_allocates_backing_store() {
        let mut surface = RasterSurface::new();
        surface.resize(100.0, 40.0, 1.5).unwrap();
        assert_eq!(surface.backing_size(), (150, 60));
        assert_eq!(surface.css_size(), (100.0, 40.0));
        assert_eq!(surface.painted_pixels(), 0);
    }

    #[test]
    fn test_fill_rect_clips_and_blends() {
        let mut surface = RasterSurface::new();
        surface.resize(4.0, 4.0, 1.0).unwrap();
        surface.fill_rect(-2.0, -2.0, 4.0, 4.0, Rgb::new(0, 0, 255), 1.0).unwrap();
        assert_eq!(surface.painted_pixels(), 4);
        assert_eq!(surface.pixel(1, 1), [0, 0, 255, 255]);

        surface.fill_rect(3.0, 3.0, 1.0, 1.0, Rgb::WHITE, 0.5).unwrap();
        assert_eq!(surface.pixel(3, 3), [255, 255, 255, 128]);

        surface.clear().unwrap();
        assert_eq!(surface.painted_pixels(), 0);
    }

    #[test]
    fn test_text_blocks() {
        let mut surface = RasterSurface::new();
        surface.resize(100.0, 20.0, 1.0).unwrap();
        let s = style(20.0, Alignment::Left);
        // "A B": two 12px cells with ink 8px wide and 14px tall
        surface.fill_text("A B", &s, 0.0, 10.0).unwrap();
        assert_eq!(surface.measure_text("A B", &s).unwrap(), 36.0);
        assert_eq!(surface.painted_pixels(), 2 * 8 * 14);
        assert_eq!(surface.pixel(5, 10), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(0, 10)[3], 0);
        assert_eq!(surface.pixel(12, 10)[3], 0);
        assert_eq!(surface.pixel(30, 10)[3], 255);
    }

    #[test]
    fn test_alignment_anchors() {
        let mut surface = RasterSurface::new();
        surface.resize(60.0, 20.0, 1.0).unwrap();
        surface.fill_text("A", &style(10.0, Alignment::Right), 60.0, 10.0).unwrap();
        assert_eq!(surface.pixel(58, 10)[3], 255);
        assert_eq!(surface.pixel(53, 10)[3], 0);

        surface.clear().unwrap();
        surface.fill_text("A", &style(10.0, Alignment::Center), 30.0, 10.0).unwrap();
        assert_eq!(surface.pixel(30, 10)[3], 255);
        assert_eq!(surface.pixel(27, 10)[3], 0);
    }

    #[test]
    fn test_unavailable_surface() {
        let mut surface = RasterSurface::unavailable();
        assert_eq!(surface.clear(), Err(SurfaceError::ContextUnavailable));
        assert_eq!(surface.read_pixels(), Err(SurfaceError::ContextUnavailable));
        assert!(surface.resize(10.0, 10.0, 1.0).is_err());
    }
}
