//! Source labelling and `group-title` re-tagging.
//!
//! Every entry of a source is tagged with a label derived from the source
//! URL, so `group-title="News"` fetched from `.../fra.m3u` becomes
//! `group-title="FRA - News"`.

use crate::playlist::{attribute, entry_pairs, Attribute, STANDARD_MARKER};

/// Strip the extension like a path "splitext": leading dots never start one.
fn strip_extension(file_name: &str) -> &str {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(pos) => &file_name[..leading_dots + pos],
        None => file_name,
    }
}

/// Label of a source: its last path segment, without extension, upper-cased.
pub fn source_label(url: &str) -> String {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    strip_extension(file_name).to_uppercase()
}

/// Rewrite a metadata line so its group-title carries the source label.
pub fn retag_extinf_line(line: &str, label: &str) -> String {
    if let Some(existing) = attribute(line, Attribute::GroupTitle) {
        return line.replace(
            &format!("group-title=\"{}\"", existing),
            &format!("group-title=\"{} - {}\"", label, existing),
        );
    }

    if line.contains(STANDARD_MARKER) {
        line.replace(
            STANDARD_MARKER,
            &format!("{} group-title=\"{}\"", STANDARD_MARKER, label),
        )
    } else {
        line.replace("#EXTINF:", &format!("#EXTINF:0 group-title=\"{}\" ", label))
    }
}

/// Append every valid entry of `text` to `combined`, re-tagged with `label`.
///
/// Returns the number of entries appended.
pub fn append_source(combined: &mut String, text: &str, label: &str) -> usize {
    let pairs = entry_pairs(text);

    for (meta, url) in &pairs {
        combined.push_str(&retag_extinf_line(meta, label));
        combined.push('\n');
        combined.push_str(url);
        combined.push('\n');
    }

    pairs.len()
}
