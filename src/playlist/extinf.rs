//! `#EXTINF` metadata line parsing and building.
//!
//! Extraction is tolerant: upstream playlists are uncontrolled, so missing
//! or malformed attributes become empty strings instead of errors.

use super::{EXTINF_MARKER, STANDARD_MARKER};
use crate::models::Entry;
use once_cell::sync::Lazy;
use regex::Regex;

static TVG_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"tvg-id="([^"]*)""#).expect("tvg-id pattern"));
static TVG_LOGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"tvg-logo="([^"]*)""#).expect("tvg-logo pattern"));
static GROUP_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"group-title="([^"]*)""#).expect("group-title pattern"));

/// Attributes read from a metadata line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    TvgId,
    TvgLogo,
    GroupTitle,
}

impl Attribute {
    fn regex(self) -> &'static Regex {
        match self {
            Attribute::TvgId => &*TVG_ID_RE,
            Attribute::TvgLogo => &*TVG_LOGO_RE,
            Attribute::GroupTitle => &*GROUP_TITLE_RE,
        }
    }
}

/// Value of the first `key="value"` occurrence of `attr` on the line.
pub fn attribute(line: &str, attr: Attribute) -> Option<&str> {
    attr.regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Text after the last comma, trimmed.
fn display_name(line: &str) -> &str {
    line.rfind(',')
        .map(|pos| line[pos + 1..].trim())
        .unwrap_or("")
}

/// Parse a metadata line. Returns `None` if the line is not one.
///
/// The returned entry has an empty `url`; the caller pairs it with the
/// following line.
pub fn parse_extinf_line(line: &str) -> Option<Entry> {
    if !line.starts_with(EXTINF_MARKER) {
        return None;
    }

    Some(Entry {
        tvg_id: attribute(line, Attribute::TvgId).unwrap_or("").to_string(),
        tvg_logo: attribute(line, Attribute::TvgLogo).unwrap_or("").to_string(),
        group_title: attribute(line, Attribute::GroupTitle)
            .unwrap_or("")
            .to_string(),
        name: display_name(line).to_string(),
        url: String::new(),
    })
}

/// Build a clean metadata line. Empty `tvg-id`/`tvg-logo` are omitted.
pub fn build_extinf_line(tvg_id: &str, tvg_logo: &str, group_title: &str, name: &str) -> String {
    let mut parts = vec![STANDARD_MARKER.to_string()];

    if !tvg_id.is_empty() {
        parts.push(format!("tvg-id=\"{}\"", tvg_id));
    }
    if !tvg_logo.is_empty() {
        parts.push(format!("tvg-logo=\"{}\"", tvg_logo));
    }
    parts.push(format!("group-title=\"{}\"", group_title));

    format!("{},{}", parts.join(" "), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let line = r#"#EXTINF:-1 tvg-id="TF1.fr" tvg-logo="https://logo/tf1.png" group-title="FRA - General",TF1 (1080p)"#;
        let entry = parse_extinf_line(line).unwrap();
        assert_eq!(entry.tvg_id, "TF1.fr");
        assert_eq!(entry.tvg_logo, "https://logo/tf1.png");
        assert_eq!(entry.group_title, "FRA - General");
        assert_eq!(entry.name, "TF1 (1080p)");
        assert!(entry.url.is_empty());
    }

    #[test]
    fn test_parse_reordered_and_missing_attributes() {
        let line = r#"#EXTINF:-1 group-title="News" tvg-id="X.fr",  Some Name  "#;
        let entry = parse_extinf_line(line).unwrap();
        assert_eq!(entry.tvg_id, "X.fr");
        assert_eq!(entry.tvg_logo, "");
        assert_eq!(entry.group_title, "News");
        assert_eq!(entry.name, "Some Name");
    }

    #[test]
    fn test_name_uses_last_comma() {
        let entry = parse_extinf_line(r#"#EXTINF:-1 group-title="A,B",Name"#).unwrap();
        assert_eq!(entry.name, "Name");
        assert_eq!(entry.group_title, "A,B");
    }

    #[test]
    fn test_no_comma_gives_empty_name() {
        let entry = parse_extinf_line("#EXTINF:-1 tvg-id=\"x\"").unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.tvg_id, "x");
    }

    #[test]
    fn test_unterminated_attribute_is_empty() {
        let entry = parse_extinf_line("#EXTINF:-1 tvg-logo=\"http://broken,Name").unwrap();
        assert_eq!(entry.tvg_logo, "");
        assert_eq!(entry.name, "Name");
    }

    #[test]
    fn test_not_a_metadata_line() {
        assert!(parse_extinf_line("http://example.com/stream.m3u8").is_none());
        assert!(parse_extinf_line("#EXTM3U").is_none());
    }

    #[test]
    fn test_attribute_first_occurrence() {
        let line = r#"#EXTINF:-1 group-title="One" group-title="Two",N"#;
        assert_eq!(attribute(line, Attribute::GroupTitle), Some("One"));
        assert_eq!(attribute(line, Attribute::TvgId), None);
    }

    #[test]
    fn test_build_line() {
        assert_eq!(
            build_extinf_line("TF1.fr", "", "French - News", "TF1"),
            r#"#EXTINF:-1 tvg-id="TF1.fr" group-title="French - News",TF1"#
        );
        assert_eq!(
            build_extinf_line("", "", "International - Autre", "X"),
            r#"#EXTINF:-1 group-title="International - Autre",X"#
        );
        assert_eq!(
            build_extinf_line("a", "b", "R - C", "N"),
            r#"#EXTINF:-1 tvg-id="a" tvg-logo="b" group-title="R - C",N"#
        );
    }
}
