//! Run report generation.
//!
//! This module renders the end-of-run console summary and the optional
//! JSON report from a `RunReport`.

use crate::config::OutputSettings;
use crate::models::RunReport;
use anyhow::{Context, Result};
use std::path::Path;

/// How many categories the console summary lists.
const TOP_CATEGORIES: usize = 5;

/// Generate the console summary of a run.
pub fn generate_summary_text(report: &RunReport, output: &OutputSettings) -> String {
    let mut lines = Vec::new();

    if report.stage.merges() {
        let failed = report.sources.iter().filter(|s| !s.is_success()).count();
        lines.push(format!(
            "   Sources: {} fetched, {} failed",
            report.sources.len() - failed,
            failed
        ));
        lines.push(format!("   Merged entries: {}", report.raw_entries));
        lines.push(format!(
            "   Merged playlist: {}",
            output.raw_playlist.display()
        ));
    }

    if let Some(ref clean) = report.clean {
        lines.push(format!("   Total channels: {}", clean.channels));

        if !clean.regions.is_empty() {
            let regions: Vec<String> = clean
                .regions
                .iter()
                .map(|(region, count)| format!("{} ({})", region, count))
                .collect();
            lines.push(format!("   Regions: {}", regions.join(", ")));
        }

        let top = clean.top_categories(TOP_CATEGORIES);
        if !top.is_empty() {
            let categories: Vec<String> = top
                .iter()
                .map(|(category, count)| format!("{} ({})", category, count))
                .collect();
            lines.push(format!("   Top categories: {}", categories.join(", ")));
        }

        lines.push(format!(
            "   Clean playlist: {}",
            output.clean_playlist.display()
        ));
    }

    lines.push(format!("   Duration: {:.1}s", report.duration_seconds));

    lines.join("\n")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &RunReport, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
