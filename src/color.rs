//! CSS colour parsing for the text fill colour.

/// An opaque RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns a CSS `rgb(r,g,b)` string.
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Returns a CSS `rgba(r,g,b,a)` string with `alpha` clamped to 0..=1.
    pub fn css_rgba(&self, alpha: f64) -> String {
        let a = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        format!("rgba({},{},{},{})", self.r, self.g, self.b, a)
    }
}

/// Parse a color string into an [`Rgb`].
///
/// Supports:
/// - Named colors: black, white, red, green, blue, yellow, cyan, magenta,
///   gray/grey, orange, purple, pink, brown
/// - Hex: `#RGB` (expanded to `#RRGGBB`), `#RRGGBB`
/// - Functional: `rgb(r, g, b)` and `rgba(r, g, b, a)` (alpha is ignored)
/// - Case-insensitive, trims whitespace
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if s.starts_with('#') {
        parse_hex(s)
    } else if s.contains('(') {
        parse_functional(s)
    } else {
        parse_named(s)
    }
}

/// Parse a color string, falling back to white for invalid values.
pub fn parse_color_or_white(s: &str) -> Rgb {
    parse_color(s).unwrap_or_else(|| {
        log::warn!("unrecognised color {s:?}, using white");
        Rgb::WHITE
    })
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Rgb::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_functional(s: &str) -> Option<Rgb> {
    let lower = s.to_ascii_lowercase();
    let (name, rest) = lower.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    match (name.trim(), parts.len()) {
        ("rgb", 3) | ("rgba", 4) => {}
        _ => return None,
    }

    let channel = |p: &str| -> Option<u8> {
        let v: f64 = p.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    Some(Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

fn parse_named(s: &str) -> Option<Rgb> {
    let (r, g, b) = match s.to_lowercase().as_str() {
        "black"         => (0, 0, 0),
        "white"         => (255, 255, 255),
        "red"           => (255, 0, 0),
        "green"         => (0, 128, 0),
        "blue"          => (0, 0, 255),
        "yellow"        => (255, 255, 0),
        "cyan"          => (0, 255, 255),
        "magenta"       => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "orange"        => (255, 165, 0),
        "purple"        => (128, 0, 128),
        "pink"          => (255, 192, 203),
        "brown"         => (139, 69, 19),
        _               => return None,
    };
    Some(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("black"),    Some(Rgb::new(0, 0, 0)));
        assert_eq!(parse_color("white"),    Some(Rgb::new(255, 255, 255)));
        assert_eq!(parse_color("green"),    Some(Rgb::new(0, 128, 0)));
        assert_eq!(parse_color("grey"),     Some(Rgb::new(128, 128, 128)));
        assert_eq!(parse_color("Orange"),   Some(Rgb::new(255, 165, 0)));
        assert_eq!(parse_color("  pink  "), Some(Rgb::new(255, 192, 203)));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#FF0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(parse_color("#f6f6f6"), Some(Rgb::new(246, 246, 246)));
        assert_eq!(parse_color("#abc"),    Some(Rgb::new(170, 187, 204)));
    }

    #[test]
    fn functional_colors() {
        assert_eq!(parse_color("rgb(255,255,255)"),       Some(Rgb::WHITE));
        assert_eq!(parse_color("rgb( 10, 20 , 30 )"),     Some(Rgb::new(10, 20, 30)));
        assert_eq!(parse_color("RGBA(1, 2, 3, 0.5)"),     Some(Rgb::new(1, 2, 3)));
        assert_eq!(parse_color("rgb(300, -4, 12.6)"),     Some(Rgb::new(255, 0, 13)));
    }

    #[test]
    fn invalid_colors() {
        assert_eq!(parse_color(""),               None);
        assert_eq!(parse_color("notacolor"),      None);
        assert_eq!(parse_color("#12345"),         None);
        assert_eq!(parse_color("#zz"),            None);
        assert_eq!(parse_color("rgb(1,2)"),       None);
        assert_eq!(parse_color("rgba(1,2,3)"),    None);
        assert_eq!(parse_color("hsl(1,2%,3%)"),   None);
        assert_eq!(parse_color("rgb(a,b,c)"),     None);
    }

    #[test]
    fn fallback_is_white() {
        assert_eq!(parse_color_or_white("alsobad"), Rgb::WHITE);
        assert_eq!(parse_color_or_white("blue"), Rgb::new(0, 0, 255));
    }

    #[test]
    fn css_strings() {
        let c = Rgb::new(12, 34, 56);
        assert_eq!(c.css(), "rgb(12,34,56)");
        assert_eq!(c.css_rgba(0.5), "rgba(12,34,56,0.5)");
        assert_eq!(c.css_rgba(2.0), "rgba(12,34,56,1)");
        assert_eq!(c.css_rgba(f64::NAN), "rgba(12,34,56,0)");
    }
}
