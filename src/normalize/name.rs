//! Display name cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag marking streams only reachable from some countries.
pub const GEO_BLOCKED_TAG: &str = "[Geo-blocked]";

/// Appended to the name of geo-blocked channels.
pub const GLOBE: &str = "🌍";

static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d+p\)").expect("resolution pattern"));
static NOT_24_7_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[Not 24/7\]").expect("availability pattern"));
static GEO_BLOCKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[Geo-blocked\]").expect("geo-blocked pattern"));

/// Strip resolution and availability tags from a channel name.
///
/// `"BBC One (1080p) [Not 24/7]"` becomes `"BBC One"`, and a
/// `[Geo-blocked]` tag is replaced by a trailing globe.
pub fn clean_channel_name(name: &str) -> String {
    // Must be checked before the tag is stripped.
    let geo_blocked = name.contains(GEO_BLOCKED_TAG);

    let name = RESOLUTION_RE.replace_all(name, "");
    let name = NOT_24_7_RE.replace_all(&name, "");
    let name = GEO_BLOCKED_RE.replace_all(&name, "");
    let name = name.trim();

    if geo_blocked {
        format!("{} {}", name, GLOBE)
    } else {
        name.to_string()
    }
}
