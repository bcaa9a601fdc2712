//! Error types for settings loading and playlist fetching.
//!
//! Both are recoverable at different levels: a `SettingsError` aborts the
//! run, a `FetchError` only drops the source it belongs to.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid priority for category '{category}' on line {line}: '{value}' is not an integer")]
    InvalidPriority {
        line: usize,
        category: String,
        value: String,
    },

    #[error("No sources configured in {}", path.display())]
    NoSources { path: PathBuf },
}

/// Errors raised while retrieving a remote playlist.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Cannot connect to {url}")]
    Connect { url: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to request {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
