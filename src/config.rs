//! Animation configuration supplied by the host.

use crate::color::{parse_color_or_white, Rgb};
use crate::error::ConfigError;
use crate::seo::Tag;
use crate::sizing;

/// Direction the dispersal frontier sweeps across the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Horizontal anchor of the text within the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    /// Canvas `textAlign` keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Font used to rasterise the text.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontDescriptor {
    /// CSS font family list
    pub family: String,
    /// Size in CSS pixels
    pub size_px: f64,
    /// CSS numeric weight
    pub weight: u16,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size_px: 50.0,
            weight: 400,
        }
    }
}

/// Per-phase durations in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationDurations {
    pub vaporize: f64,
    pub fade_in: f64,
    pub wait: f64,
}

impl AnimationDurations {
    pub const DEFAULT_VAPORIZE: f64 = 2.0;
    pub const DEFAULT_FADE_IN: f64 = 1.0;
    pub const DEFAULT_WAIT: f64 = 0.5;

    /// Dispersal sweep duration in milliseconds.
    pub fn vaporize_ms(&self) -> f64 {
        or_default(self.vaporize, Self::DEFAULT_VAPORIZE) * 1000.0
    }

    /// Fade-in duration in milliseconds.
    pub fn fade_in_ms(&self) -> f64 {
        or_default(self.fade_in, Self::DEFAULT_FADE_IN) * 1000.0
    }

    /// Hold time between fade-in and the next sweep, in milliseconds.
    pub fn wait_ms(&self) -> f64 {
        or_default(self.wait, Self::DEFAULT_WAIT) * 1000.0
    }
}

impl Default for AnimationDurations {
    fn default() -> Self {
        Self {
            vaporize: Self::DEFAULT_VAPORIZE,
            fade_in: Self::DEFAULT_FADE_IN,
            wait: Self::DEFAULT_WAIT,
        }
    }
}

// Zero, negative and non-finite durations all mean "use the default".
fn or_default(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

/// Everything the host can configure about one animation instance.
///
/// All fields have defaults, so a partial TOML document is enough:
///
/// ```rust
/// use vaporize_text::{Direction, VaporizeConfig};
///
/// let config = VaporizeConfig {
///     texts: vec!["Hello".into(), "World".into()],
///     direction: Direction::RightToLeft,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.base_color(), vaporize_text::Rgb::WHITE);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VaporizeConfig {
    /// Strings cycled through in order
    pub texts: Vec<String>,
    pub font: FontDescriptor,
    /// CSS colour of the text
    pub color: String,
    /// Dispersal spread knob, roughly 0..10
    pub spread: f64,
    /// Drifting particle density knob, roughly 0..10
    pub density: f64,
    pub animation: AnimationDurations,
    pub direction: Direction,
    pub alignment: Alignment,
    /// Element used for the hidden text passthrough
    pub tag: Tag,
}

impl Default for VaporizeConfig {
    fn default() -> Self {
        Self {
            texts: vec![
                "Sopravvissuto allo snap di thanos.".to_string(),
                "A volte sparisco, ma torno sempre.".to_string(),
                "Il caos è parte del mio codice.".to_string(),
            ],
            font: FontDescriptor::default(),
            color: "rgb(255,255,255)".to_string(),
            spread: 5.0,
            density: 5.0,
            animation: AnimationDurations::default(),
            direction: Direction::LeftToRight,
            alignment: Alignment::Center,
            tag: Tag::P,
        }
    }
}

impl VaporizeConfig {
    /// Parse a TOML document into a `VaporizeConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the animation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texts.is_empty() {
            return Err(ConfigError::NoTexts);
        }
        Ok(())
    }

    /// Parsed text colour, white when the configured value is invalid.
    pub fn base_color(&self) -> Rgb {
        parse_color_or_white(&self.color)
    }

    /// Fraction of reached particles that drift rather than fade instantly.
    pub fn density_fraction(&self) -> f64 {
        sizing::density_fraction(self.density)
    }

    /// Dispersal spread scaled for the configured font size.
    pub fn effective_spread(&self) -> f64 {
        sizing::spread_for_font_size(self.font.size_px) * self.spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = VaporizeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.texts.len(), 3);
        assert_eq!(config.base_color(), Rgb::WHITE);
        // 50px font: base spread 0.5, knob 5
        assert!((config.effective_spread() - 2.5).abs() < 1e-9);
        assert!((config.density_fraction() - 0.65).abs() < 1e-9);
    }

    #[test]
    fn empty_texts_rejected() {
        let config = VaporizeConfig {
            texts: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoTexts)));
    }

    #[test]
    fn durations_fall_back_to_defaults() {
        let durations = AnimationDurations {
            vaporize: 0.0,
            fade_in: -1.0,
            wait: f64::NAN,
        };
        assert_eq!(durations.vaporize_ms(), 2000.0);
        assert_eq!(durations.fade_in_ms(), 1000.0);
        assert_eq!(durations.wait_ms(), 500.0);

        let custom = AnimationDurations {
            vaporize: 1.0,
            fade_in: 0.25,
            wait: 3.0,
        };
        assert_eq!(custom.vaporize_ms(), 1000.0);
        assert_eq!(custom.fade_in_ms(), 250.0);
        assert_eq!(custom.wait_ms(), 3000.0);
    }

    #[test]
    fn invalid_color_falls_back() {
        let config = VaporizeConfig {
            color: "notacolor".into(),
            ..Default::default()
        };
        assert_eq!(config.base_color(), Rgb::WHITE);
    }

    #[test]
    fn alignment_keywords() {
        assert_eq!(Alignment::Left.as_str(), "left");
        assert_eq!(Alignment::Center.as_str(), "center");
        assert_eq!(Alignment::Right.as_str(), "right");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_partial() {
        let config = VaporizeConfig::from_toml_str(
            r##"
            texts = ["One", "Two"]
            color = "#ff0000"
            direction = "right-to-left"
            alignment = "left"
            tag = "h2"

            [font]
            family = "serif"
            size_px = 80.0

            [animation]
            vaporize = 1.5
            "##,
        )
        .unwrap();
        assert_eq!(config.texts, vec!["One", "Two"]);
        assert_eq!(config.base_color(), Rgb::new(255, 0, 0));
        assert_eq!(config.direction, Direction::RightToLeft);
        assert_eq!(config.alignment, Alignment::Left);
        assert_eq!(config.tag, Tag::H2);
        assert_eq!(config.font.family, "serif");
        assert_eq!(config.font.weight, 400);
        assert_eq!(config.animation.vaporize_ms(), 1500.0);
        assert_eq!(config.animation.wait_ms(), 500.0);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_unknown_tag_falls_back() {
        let config = VaporizeConfig::from_toml_str("texts = [\"a\"]\ntag = \"div\"").unwrap();
        assert_eq!(config.tag, Tag::P);

        let config = VaporizeConfig::from_toml_str("texts = [\"a\"]\ntag = \"H1\"").unwrap();
        assert_eq!(config.tag, Tag::H1);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_rejects_empty_texts() {
        let err = VaporizeConfig::from_toml_str("texts = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoTexts));
    }
}
