//! Font-size and pixel-ratio driven calculations.

/// Extra oversampling applied on top of the device pixel ratio so that
/// particles stay fine-grained on low density displays.
pub const OVERSAMPLE: f64 = 1.5;

/// Range the user-facing `density` and `spread` knobs are expressed in.
pub const KNOB_RANGE: (f64, f64) = (0.0, 10.0);

/// Fraction of drifting particles at the extremes of the density knob.
pub const DENSITY_RANGE: (f64, f64) = (0.3, 1.0);

/// Linearly remap `value` from `input` to `output`.
///
/// With `clamp` set, the result is limited to the output range regardless
/// of its orientation.
///
/// ```rust
/// use vaporize_text::sizing::transform_value;
///
/// assert_eq!(transform_value(5.0, (0.0, 10.0), (0.0, 1.0), false), 0.5);
/// assert_eq!(transform_value(20.0, (0.0, 10.0), (0.3, 1.0), true), 1.0);
/// ```
pub fn transform_value(value: f64, input: (f64, f64), output: (f64, f64), clamp: bool) -> f64 {
    let (in_min, in_max) = input;
    let (out_min, out_max) = output;
    let progress = (value - in_min) / (in_max - in_min);
    let result = out_min + progress * (out_max - out_min);
    if clamp {
        let (lo, hi) = if out_max > out_min { (out_min, out_max) } else { (out_max, out_min) };
        result.max(lo).min(hi)
    } else {
        result
    }
}

/// Map the 0..10 density knob to the drifting fraction in 0.3..1.0.
#[inline]
pub fn density_fraction(density: f64) -> f64 {
    transform_value(density, KNOB_RANGE, DENSITY_RANGE, true)
}

/// Base dispersal spread for a CSS font size in pixels.
///
/// Small text gets a tight spread, large text a wide one:
/// - `<= 20px`: 0.2
/// - `20..50px`: 0.2 to 0.5
/// - `50..100px`: 0.5 to 1.5
/// - `>= 100px`: 1.5
pub fn spread_for_font_size(font_size: f64) -> f64 {
    if font_size <= 20.0 {
        0.2
    } else if font_size >= 100.0 {
        1.5
    } else if font_size <= 50.0 {
        0.2 + (font_size - 20.0) * (0.5 - 0.2) / (50.0 - 20.0)
    } else {
        0.5 + (font_size - 50.0) * (1.5 - 0.5) / (100.0 - 50.0)
    }
}

/// Backing-store to CSS pixel ratio actually used for a device ratio.
#[inline]
pub fn effective_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    dpr * OVERSAMPLE
}

/// Backing-store dimensions for a CSS size, truncated to whole pixels.
#[inline]
pub fn backing_dimensions(css_width: f64, css_height: f64, ratio: f64) -> (u32, u32) {
    let scale = |v: f64| if v.is_finite() && v > 0.0 { (v * ratio) as u32 } else { 0 };
    (scale(css_width), scale(css_height))
}

/// Grid step used when sampling the rasterised text.
///
/// Denser backing stores are sampled more coarsely to bound the number of
/// particles. Always at least 1.
pub fn sample_step(backing_width: u32, css_width: f64) -> u32 {
    if css_width <= 0.0 || backing_width == 0 {
        return 1;
    }
    let ratio = backing_width as f64 / css_width;
    ((ratio / 3.0).round() as u32).max(1)
}

/// Opacity scale compensating for the sampling grid coverage.
#[inline]
pub fn sample_coverage(step: u32, backing_width: u32, css_width: f64) -> f64 {
    if css_width <= 0.0 || backing_width == 0 {
        return 0.0;
    }
    step as f64 / (backing_width as f64 / css_width)
}
