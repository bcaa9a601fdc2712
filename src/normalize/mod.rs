//! Clean stage: turn the combined playlist into a sorted, categorized one.

pub mod name;
pub mod taxonomy;

pub use name::clean_channel_name;
pub use taxonomy::{category_priority, resolve_category, resolve_region};

use crate::config::Settings;
use crate::models::{Channel, CleanOutcome, Entry};
use crate::playlist;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Normalize one entry using the configured taxonomy.
pub fn to_channel(entry: &Entry, settings: &Settings) -> Channel {
    let category = resolve_category(
        &entry.group_title,
        &settings.categories_mapping,
        &settings.categories_priorities,
    );
    let priority = settings.priority_of(&category);

    Channel {
        region: resolve_region(&entry.group_title, &settings.regions),
        category,
        priority,
        name: clean_channel_name(&entry.name),
        tvg_id: entry.tvg_id.clone(),
        tvg_logo: entry.tvg_logo.clone(),
        url: entry.url.clone(),
    }
}

/// Sort by region, priority, then case-insensitive name.
///
/// The sort is stable: equal keys keep their input order.
pub fn sort_channels(channels: &mut [Channel]) {
    channels.sort_by_cached_key(Channel::sort_key);
}

/// Parse, normalize and sort every valid entry of a playlist document.
pub fn normalize_document(text: &str, settings: &Settings) -> Vec<Channel> {
    let mut channels: Vec<Channel> = playlist::parse_entries(text)
        .iter()
        .map(|entry| to_channel(entry, settings))
        .collect();

    sort_channels(&mut channels);
    channels
}

/// Read the raw playlist, write the clean playlist.
pub fn clean_playlist(input: &Path, output: &Path, settings: &Settings) -> Result<CleanOutcome> {
    info!("Cleaning playlist {}", input.display());

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read raw playlist: {}", input.display()))?;

    let channels = normalize_document(&text, settings);
    debug!("Normalized {} channels", channels.len());

    std::fs::write(output, playlist::serialize_channels(&channels))
        .with_context(|| format!("Failed to write clean playlist: {}", output.display()))?;

    info!(
        "Wrote {} channels to {}",
        channels.len(),
        output.display()
    );

    Ok(CleanOutcome::from_channels(&channels))
}
