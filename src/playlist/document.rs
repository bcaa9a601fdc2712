//! Whole-document scanning and serialization.

use super::{build_extinf_line, parse_extinf_line, EXTINF_MARKER, HEADER};
use crate::models::{Channel, Entry};

/// Find every metadata line that is immediately followed by a URL line.
///
/// Lines are trimmed. A metadata line whose next line is empty or starts
/// with `#` is treated as noise and the scan resumes on the next line, which
/// also skips the `#EXTM3U` header and other directives.
pub fn entry_pairs(text: &str) -> Vec<(&str, &str)> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with(EXTINF_MARKER) {
            if let Some(next) = lines.get(i + 1) {
                if !next.is_empty() && !next.starts_with('#') {
                    pairs.push((lines[i], *next));
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }

    pairs
}

/// Parse every valid entry of a playlist document, in document order.
pub fn parse_entries(text: &str) -> Vec<Entry> {
    entry_pairs(text)
        .into_iter()
        .filter_map(|(meta, url)| {
            parse_extinf_line(meta).map(|entry| Entry {
                url: url.to_string(),
                ..entry
            })
        })
        .collect()
}

/// Render channels as a playlist document, in the given order.
pub fn serialize_channels(channels: &[Channel]) -> String {
    let mut output = String::new();
    output.push_str(HEADER);
    output.push('\n');

    for channel in channels {
        output.push_str(&build_extinf_line(
            &channel.tvg_id,
            &channel.tvg_logo,
            &channel.group_title(),
            &channel.name,
        ));
        output.push('\n');
        output.push_str(&channel.url);
        output.push('\n');
    }

    output
}
