//! M3U playlist reading and writing.
//!
//! Only the line-pair convention is supported: a `#EXTINF` metadata line
//! followed by the stream URL on the next line.

pub mod document;
pub mod extinf;

pub use document::{entry_pairs, parse_entries, serialize_channels};
pub use extinf::{attribute, build_extinf_line, parse_extinf_line, Attribute};

/// First line of every playlist document.
pub const HEADER: &str = "#EXTM3U";

/// Prefix of a metadata line.
pub const EXTINF_MARKER: &str = "#EXTINF";

/// Metadata marker with the conventional "no duration" token.
pub const STANDARD_MARKER: &str = "#EXTINF:-1";
