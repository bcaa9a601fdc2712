//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Stage;
use clap::Parser;
use std::path::PathBuf;

/// m3u-merge - merge remote IPTV playlists into one clean playlist
///
/// Fetches every playlist listed in the settings file, tags each entry
/// with its source, then sorts the result by region, category and name.
///
/// Examples:
///   m3u-merge
///   m3u-merge --settings my-settings.txt --concurrency 4
///   m3u-merge --stage clean --clean-output tv.m3u
///   m3u-merge --dry-run
///   m3u-merge --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the settings file
    #[arg(
        short,
        long,
        default_value = "settings.txt",
        value_name = "FILE",
        env = "M3U_MERGE_SETTINGS"
    )]
    pub settings: PathBuf,

    /// Pipeline stages to run (all, merge, clean)
    #[arg(long, default_value = "all", value_name = "STAGE")]
    pub stage: Stage,

    /// Override the merged playlist path from the settings file
    #[arg(long, value_name = "FILE")]
    pub raw_output: Option<PathBuf>,

    /// Override the clean playlist path from the settings file
    #[arg(long, value_name = "FILE")]
    pub clean_output: Option<PathBuf>,

    /// Per-request fetch timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    pub timeout: u64,

    /// Number of sources fetched at the same time
    ///
    /// The merged playlist keeps the configured source order regardless.
    #[arg(long, default_value = "1", value_name = "NUM")]
    pub concurrency: usize,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// List the configured sources and their labels without fetching
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default settings file at the --settings path
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.timeout == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(raw), Some(clean)) = (&self.raw_output, &self.clean_output) {
            if raw == clean {
                return Err("--raw-output and --clean-output must differ".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
