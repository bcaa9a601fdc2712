//! Data models for playlist merging and cleaning.
//!
//! This module contains the core data structures passed between the
//! merge stage, the clean stage and the run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One metadata line / URL line pair, with the metadata extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// `tvg-id` attribute, empty when absent.
    pub tvg_id: String,
    /// `tvg-logo` attribute, empty when absent.
    pub tvg_logo: String,
    /// Raw `group-title` attribute, empty when absent.
    pub group_title: String,
    /// Display name after the last comma.
    pub name: String,
    /// Stream URL from the following line.
    pub url: String,
}

/// A normalized, categorized entry ready for sorting and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub region: String,
    pub category: String,
    /// Priority of `category` (lower sorts first).
    pub priority: i64,
    pub name: String,
    pub tvg_id: String,
    pub tvg_logo: String,
    pub url: String,
}

impl Channel {
    /// The `group-title` value written for this channel.
    pub fn group_title(&self) -> String {
        format!("{} - {}", self.region, self.category)
    }

    /// Sort key: region, then priority, then case-insensitive name.
    pub fn sort_key(&self) -> (String, i64, String) {
        (self.region.clone(), self.priority, self.name.to_lowercase())
    }
}

/// Which pipeline stages a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Merge the sources, then clean the merged playlist
    #[default]
    All,
    /// Only merge the sources into the raw playlist
    Merge,
    /// Only clean an existing raw playlist
    Clean,
}

impl Stage {
    pub fn merges(&self) -> bool {
        matches!(self, Stage::All | Stage::Merge)
    }

    pub fn cleans(&self) -> bool {
        matches!(self, Stage::All | Stage::Clean)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::All => write!(f, "all"),
            Stage::Merge => write!(f, "merge"),
            Stage::Clean => write!(f, "clean"),
        }
    }
}

/// Result of processing one configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutcome {
    /// Source URL as configured.
    pub url: String,
    /// Label derived from the URL file name.
    pub label: String,
    /// Number of entries appended to the combined playlist.
    pub entries: usize,
    /// Fetch error message, if the source was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Output of the merge stage.
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    /// Combined playlist text, header included.
    pub document: String,
    /// Per-source results in configured order.
    pub sources: Vec<SourceOutcome>,
}

impl AggregateOutcome {
    /// Total entries across all sources.
    pub fn total_entries(&self) -> usize {
        self.sources.iter().map(|s| s.entries).sum()
    }

    /// Number of sources that could not be fetched.
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| !s.is_success()).count()
    }
}

/// Output of the clean stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOutcome {
    /// Channels written to the clean playlist.
    pub channels: usize,
    /// Channels per display region.
    pub regions: BTreeMap<String, usize>,
    /// Channels per display category.
    pub categories: BTreeMap<String, usize>,
}

impl CleanOutcome {
    /// Creates a summary from the written channels.
    pub fn from_channels(channels: &[Channel]) -> Self {
        let mut outcome = Self {
            channels: channels.len(),
            ..Self::default()
        };

        for channel in channels {
            *outcome.regions.entry(channel.region.clone()).or_insert(0) += 1;
            *outcome
                .categories
                .entry(channel.category.clone())
                .or_insert(0) += 1;
        }

        outcome
    }

    /// The `n` most populated categories, largest first.
    pub fn top_categories(&self, n: usize) -> Vec<(&str, usize)> {
        let mut categories: Vec<(&str, usize)> = self
            .categories
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();

        categories.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        categories.truncate(n);
        categories
    }
}

/// Machine-readable summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Stages that were executed.
    pub stage: Stage,
    /// Per-source merge results (empty for clean-only runs).
    pub sources: Vec<SourceOutcome>,
    /// Entries in the combined playlist.
    pub raw_entries: usize,
    /// Clean stage results, absent for merge-only runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<CleanOutcome>,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(region: &str, priority: i64, name: &str) -> Channel {
        Channel {
            region: region.to_string(),
            category: "News".to_string(),
            priority,
            name: name.to_string(),
            tvg_id: String::new(),
            tvg_logo: String::new(),
            url: "http://example.com/stream".to_string(),
        }
    }

    #[test]
    fn test_channel_group_title() {
        let ch = channel("French", 1, "TF1");
        assert_eq!(ch.group_title(), "French - News");
    }

    #[test]
    fn test_channel_sort_key_ordering() {
        let a = channel("French", 1, "zeta");
        let b = channel("French", 1, "Alpha");
        let c = channel("Belgian", 50, "Zeta");
        assert!(b.sort_key() < a.sort_key());
        assert!(c.sort_key() < b.sort_key());
    }

    #[test]
    fn test_stage_flags() {
        assert!(Stage::All.merges() && Stage::All.cleans());
        assert!(Stage::Merge.merges() && !Stage::Merge.cleans());
        assert!(!Stage::Clean.merges() && Stage::Clean.cleans());
        assert_eq!(Stage::default(), Stage::All);
    }

    #[test]
    fn test_aggregate_outcome_counts() {
        let outcome = AggregateOutcome {
            document: String::new(),
            sources: vec![
                SourceOutcome {
                    url: "https://a/fra.m3u".to_string(),
                    label: "FRA".to_string(),
                    entries: 3,
                    error: None,
                },
                SourceOutcome {
                    url: "https://a/bel.m3u".to_string(),
                    label: "BEL".to_string(),
                    entries: 0,
                    error: Some("timed out".to_string()),
                },
            ],
        };
        assert_eq!(outcome.total_entries(), 3);
        assert_eq!(outcome.failed_sources(), 1);
    }

    #[test]
    fn test_clean_outcome_from_channels() {
        let mut kids = channel("French", 2, "Gulli");
        kids.category = "Kids".to_string();
        let channels = vec![
            channel("French", 1, "TF1"),
            channel("Belgian", 1, "RTL"),
            kids,
        ];

        let outcome = CleanOutcome::from_channels(&channels);
        assert_eq!(outcome.channels, 3);
        assert_eq!(outcome.regions.get("French"), Some(&2));
        assert_eq!(outcome.regions.get("Belgian"), Some(&1));
        assert_eq!(outcome.top_categories(1), vec![("News", 2)]);
        assert_eq!(outcome.top_categories(5).len(), 2);
    }

    #[test]
    fn test_report_serialization() {
        let report = RunReport {
            generated_at: Utc::now(),
            stage: Stage::Merge,
            sources: vec![],
            raw_entries: 0,
            clean: None,
            duration_seconds: 0.5,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"stage\":\"merge\""));
        assert!(!json.contains("\"clean\""));
    }
}
