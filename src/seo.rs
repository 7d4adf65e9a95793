//! Visually hidden plain-text copy of the animated strings.
//!
//! The canvas is opaque to screen readers and crawlers, so the full text list
//! is also emitted as ordinary markup that takes no space and cannot be
//! interacted with.

/// Inline style applied to the hidden element.
pub const HIDDEN_STYLE: &str =
    "position:absolute;width:0;height:0;overflow:hidden;user-select:none;pointer-events:none";

/// Element used for the hidden text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", from = "String"))]
pub enum Tag {
    H1,
    H2,
    H3,
    #[default]
    P,
}

impl Tag {
    /// Parse a tag name, falling back to `P` for anything unrecognised.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "p" => Tag::P,
            other => {
                log::debug!("unknown tag {other:?}, using <p>");
                Tag::P
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::P => "p",
        }
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::parse(&s)
    }
}

/// Text content of the hidden element: every string joined by a space.
pub fn hidden_text(texts: &[String]) -> String {
    texts.join(" ")
}

/// Render the hidden element as an HTML string.
///
/// ```rust
/// use vaporize_text::seo::{hidden_markup, Tag};
///
/// let html = hidden_markup(Tag::H2, &["a < b".to_string(), "c".to_string()]);
/// assert!(html.starts_with("<h2 style=\""));
/// assert!(html.ends_with(">a &lt; b c</h2>"));
/// ```
pub fn hidden_markup(tag: Tag, texts: &[String]) -> String {
    let name = tag.as_str();
    format!(
        "<{name} style=\"{HIDDEN_STYLE}\">{}</{name}>",
        escape_html(&hidden_text(texts))
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!(Tag::parse("h1"), Tag::H1);
        assert_eq!(Tag::parse("H2"), Tag::H2);
        assert_eq!(Tag::parse(" h3 "), Tag::H3);
        assert_eq!(Tag::parse("p"), Tag::P);
    }

    #[test]
    fn unknown_tag_falls_back_to_paragraph() {
        assert_eq!(Tag::parse("script"), Tag::P);
        assert_eq!(Tag::parse(""), Tag::P);
        assert_eq!(Tag::parse("h4"), Tag::P);
    }

    #[test]
    fn from_string_uses_parse() {
        assert_eq!(Tag::from("h3".to_string()), Tag::H3);
        assert_eq!(Tag::from("div".to_string()), Tag::P);
    }

    #[test]
    fn markup_escapes_and_joins() {
        let texts = vec!["Tom & Jerry".to_string(), "\"quoted\"".to_string()];
        let html = hidden_markup(Tag::P, &texts);
        assert_eq!(
            html,
            format!(
                "<p style=\"{HIDDEN_STYLE}\">Tom &amp; Jerry &quot;quoted&quot;</p>"
            )
        );
    }

    #[test]
    fn hidden_text_joins_with_space() {
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(hidden_text(&texts), "a b c");
    }
}
