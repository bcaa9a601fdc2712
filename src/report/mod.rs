//! Run summaries: console text and JSON report.

pub mod generator;

pub use generator::{generate_summary_text, write_json_report};
