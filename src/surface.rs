//! Drawing surface abstraction.
//!
//! The animation needs a small immediate-mode raster API. Coordinates and
//! sizes passed through this trait are in backing-store pixels; the CSS
//! display size is tracked separately so high density displays render crisply
//! without changing layout.

use crate::color::Rgb;
use crate::config::{Alignment, FontDescriptor};
use crate::error::SurfaceError;

/// Style used when drawing and measuring text.
///
/// Text is always anchored vertically at its middle.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub weight: u16,
    /// Font size in backing-store pixels
    pub size_px: f64,
    pub color: Rgb,
    pub alignment: Alignment,
}

impl TextStyle {
    /// Build a style for `font` scaled to the backing store.
    pub fn scaled(font: &FontDescriptor, pixel_ratio: f64, color: Rgb, alignment: Alignment) -> Self {
        Self {
            family: font.family.clone(),
            weight: font.weight,
            size_px: font.size_px * pixel_ratio,
            color,
            alignment,
        }
    }

    /// CSS font shorthand, e.g. `"400 75px sans-serif"`.
    pub fn css_font(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }
}

/// RGBA8 pixels read back from a surface, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// RGBA at the given pixel, `None` when out of bounds.
    #[inline]
    pub fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A 2D raster target the animation draws on.
pub trait Surface {
    /// Display size in CSS pixels.
    fn css_size(&self) -> (f64, f64);

    /// Backing-store size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Set the display size and a backing store of `css * pixel_ratio` pixels.
    fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) -> Result<(), SurfaceError>;

    /// Clear the whole backing store to transparent.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Fill a rectangle with `color` at `alpha` opacity.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb, alpha: f64) -> Result<(), SurfaceError>;

    /// Draw filled text anchored at `(x, y)` according to the style alignment.
    fn fill_text(&mut self, text: &str, style: &TextStyle, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Advance width of `text` in backing-store pixels.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> Result<f64, SurfaceError>;

    /// Read back the whole backing store.
    fn read_pixels(&self) -> Result<PixelBuffer, SurfaceError>;
}
