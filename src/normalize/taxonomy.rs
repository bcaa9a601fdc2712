//! Region and category resolution from a raw `group-title`.
//!
//! A raw group-title looks like `"FRA - Animation;Kids"`: a region prefix,
//! the `" - "` separator, then `;`-separated categories. Without the
//! separator the whole string is the category list.

use std::collections::HashMap;

/// Separates the region prefix from the category list.
pub const GROUP_SEPARATOR: &str = " - ";

/// Region used when a group-title has no prefix.
pub const INTERNATIONAL: &str = "International";

/// Category used when no candidate category is found.
pub const FALLBACK_CATEGORY: &str = "Autre";

/// Priority of categories missing from the priorities table.
pub const DEFAULT_PRIORITY: i64 = 100;

/// Starting point of the best-priority scan; only lower values win.
const SENTINEL_PRIORITY: i64 = 999;

/// Resolve the display region of a raw group-title.
pub fn resolve_region(raw_group: &str, regions: &HashMap<String, String>) -> String {
    match raw_group.split_once(GROUP_SEPARATOR) {
        Some((prefix, _)) => {
            let prefix = prefix.trim();
            regions
                .get(prefix)
                .cloned()
                .unwrap_or_else(|| prefix.to_string())
        }
        None => INTERNATIONAL.to_string(),
    }
}

/// Priority of a display category.
pub fn category_priority(category: &str, priorities: &HashMap<String, i64>) -> i64 {
    priorities.get(category).copied().unwrap_or(DEFAULT_PRIORITY)
}

/// Mapped categories of a raw group-title, deduplicated in first-seen order.
pub fn mapped_categories(raw_group: &str, mapping: &HashMap<String, String>) -> Vec<String> {
    let category_part = raw_group
        .split_once(GROUP_SEPARATOR)
        .map(|(_, rest)| rest)
        .unwrap_or(raw_group);

    let mut mapped: Vec<String> = Vec::new();
    for raw in category_part.split(';').map(str::trim) {
        if raw.is_empty() {
            continue;
        }
        let category = mapping.get(raw).map(String::as_str).unwrap_or(raw);
        if !mapped.iter().any(|c| c == category) {
            mapped.push(category.to_string());
        }
    }

    mapped
}

/// Resolve the single display category of a raw group-title.
///
/// The mapped category with the lowest priority wins; on equal priority the
/// first one seen on the entry wins.
pub fn resolve_category(
    raw_group: &str,
    mapping: &HashMap<String, String>,
    priorities: &HashMap<String, i64>,
) -> String {
    let mut best_category = FALLBACK_CATEGORY.to_string();
    let mut best_priority = SENTINEL_PRIORITY;

    for category in mapped_categories(raw_group, mapping) {
        let priority = category_priority(&category, priorities);
        if priority < best_priority {
            best_priority = priority;
            best_category = category;
        }
    }

    best_category
}
