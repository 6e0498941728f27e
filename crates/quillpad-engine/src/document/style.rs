use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Ordered list of CSS declarations backing an element's `style` attribute.
///
/// Position, size and clip region written by direct manipulation live here,
/// which keeps them part of the serialized document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name: value; name: value` text. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut style = Style::new();
        for declaration in split_declarations(text) {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            style.set(name, value);
        }
        style
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.declarations.iter().position(|(key, _)| key == name)?;
        Some(self.declarations.remove(index).1)
    }

    /// Read a declaration holding a plain pixel length
    pub fn px(&self, name: &str) -> Option<f64> {
        static PX_REGEX: OnceLock<Regex> = OnceLock::new();
        let px_regex = PX_REGEX
            .get_or_init(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)px\s*$").expect("Invalid px regex"));

        let value = self.get(name)?;
        px_regex.captures(value)?.get(1)?.as_str().parse().ok()
    }

    pub fn set_px(&mut self, name: impl Into<String>, value: f64) {
        self.set(name, format_px(value));
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Format a length as CSS pixels, dropping insignificant decimals
pub fn format_px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}px")
    } else {
        let text = format!("{rounded:.2}");
        format!("{}px", text.trim_end_matches('0'))
    }
}

/// Split on `;` outside parentheses and quotes, so values such as
/// `url(data:image/png;base64,...)` stay whole.
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_and_display_roundtrip() {
        let style = Style::parse("max-width: 100%; height: auto; cursor: pointer");
        assert_eq!(style.get("height"), Some("auto"));
        assert_eq!(
            style.to_string(),
            "max-width: 100%; height: auto; cursor: pointer"
        );
    }

    #[test]
    fn test_parse_skips_garbage() {
        let style = Style::parse(";;width 10px; : red; left: 4px;");
        assert_eq!(style.to_string(), "left: 4px");
    }

    #[test]
    fn test_parse_keeps_semicolons_inside_url() {
        let text = "background: url(data:image/png;base64,AAAA); width: 10px";
        let mut style = Style::parse(text);
        assert_eq!(style.get("background"), Some("url(data:image/png;base64,AAAA)"));

        style.set_px("width", 20.0);
        assert_eq!(
            style.to_string(),
            "background: url(data:image/png;base64,AAAA); width: 20px"
        );
    }

    #[test]
    fn test_parse_keeps_semicolons_inside_quotes() {
        let style = Style::parse(r#"font-family: "a;b"; left: 1px"#);
        assert_eq!(style.get("font-family"), Some(r#""a;b""#));
        assert_eq!(style.px("left"), Some(1.0));
    }

    #[test]
    fn test_set_keeps_position() {
        let mut style = Style::parse("width: 10px; height: 20px");
        style.set_px("width", 42.0);
        assert_eq!(style.to_string(), "width: 42px; height: 20px");
    }

    #[rstest]
    #[case("10px", Some(10.0))]
    #[case(" -3.5px ", Some(-3.5))]
    #[case("auto", None)]
    #[case("100%", None)]
    fn test_px(#[case] value: &str, #[case] expected: Option<f64>) {
        let mut style = Style::new();
        style.set("width", value);
        assert_eq!(style.px("width"), expected);
    }

    #[rstest]
    #[case(100.0, "100px")]
    #[case(12.5, "12.5px")]
    #[case(33.333333, "33.33px")]
    #[case(-4.0, "-4px")]
    fn test_format_px(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_px(value), expected);
    }
}
