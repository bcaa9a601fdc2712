//! Settings file handling.
//!
//! The settings file is a sectioned key/value text file:
//!
//! ```text
//! [Sources]
//! https://example.com/fra.m3u
//!
//! [Categories Mapping]
//! Animation = Kids
//!
//! [Categories Priorities]
//! Kids = 1
//!
//! [Regions]
//! FRA = French
//!
//! [Output]
//! raw_playlist = playlist.m3u
//! clean_playlist = playlist-clean.m3u
//! ```

use crate::error::SettingsError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root settings structure, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Source playlist URLs, in processing order.
    pub sources: Vec<String>,

    /// Raw category label -> display category label.
    pub categories_mapping: HashMap<String, String>,

    /// Display category label -> priority (lower wins).
    pub categories_priorities: HashMap<String, i64>,

    /// Raw region prefix -> display region name.
    pub regions: HashMap<String, String>,

    /// Output file locations.
    pub output: OutputSettings,
}

/// Where the intermediate and final playlists are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Combined playlist produced by the merge stage.
    pub raw_playlist: PathBuf,

    /// Sorted playlist produced by the clean stage.
    pub clean_playlist: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            raw_playlist: default_raw_playlist(),
            clean_playlist: default_clean_playlist(),
        }
    }
}

fn default_raw_playlist() -> PathBuf {
    PathBuf::from("playlist.m3u")
}

fn default_clean_playlist() -> PathBuf {
    PathBuf::from("playlist-clean.m3u")
}

/// Section cursor while scanning the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Sources,
    CategoriesMapping,
    CategoriesPriorities,
    Regions,
    Output,
    Unknown,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header.to_lowercase().replace(' ', "_").as_str() {
            "sources" => Section::Sources,
            "categories_mapping" => Section::CategoriesMapping,
            "categories_priorities" => Section::CategoriesPriorities,
            "regions" => Section::Regions,
            "output" => Section::Output,
            _ => Section::Unknown,
        }
    }
}

/// Split `key = value` on the first `=`, trimming both sides.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    line.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
}

impl Settings {
    /// Load settings from a file path.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SettingsError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&content)
    }

    /// Parse settings from file content.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();
        let mut section: Option<Section> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let header = &line[1..line.len() - 1];
                let parsed = Section::from_header(header);
                if parsed == Section::Unknown {
                    debug!("Ignoring unknown settings section [{}]", header);
                }
                section = Some(parsed);
                continue;
            }

            match section {
                Some(Section::Sources) => settings.sources.push(line.to_string()),
                Some(Section::CategoriesMapping) => {
                    if let Some((key, value)) = split_pair(line) {
                        settings
                            .categories_mapping
                            .insert(key.to_string(), value.to_string());
                    }
                }
                Some(Section::CategoriesPriorities) => {
                    if let Some((key, value)) = split_pair(line) {
                        let priority =
                            value
                                .parse::<i64>()
                                .map_err(|_| SettingsError::InvalidPriority {
                                    line: index + 1,
                                    category: key.to_string(),
                                    value: value.to_string(),
                                })?;
                        settings
                            .categories_priorities
                            .insert(key.to_string(), priority);
                    }
                }
                Some(Section::Regions) => {
                    if let Some((key, value)) = split_pair(line) {
                        settings.regions.insert(key.to_string(), value.to_string());
                    }
                }
                Some(Section::Output) => {
                    if let Some((key, value)) = split_pair(line) {
                        match key {
                            "raw_playlist" => settings.output.raw_playlist = PathBuf::from(value),
                            "clean_playlist" => {
                                settings.output.clean_playlist = PathBuf::from(value)
                            }
                            other => debug!("Ignoring unknown output key '{}'", other),
                        }
                    }
                }
                Some(Section::Unknown) | None => {}
            }
        }

        Ok(settings)
    }

    /// Fail if there is nothing to aggregate.
    pub fn require_sources(&self, path: &Path) -> Result<(), SettingsError> {
        if self.sources.is_empty() {
            return Err(SettingsError::NoSources {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Merge these settings with CLI arguments.
    ///
    /// Output paths given on the command line take precedence over the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref raw) = args.raw_output {
            self.output.raw_playlist = raw.clone();
        }
        if let Some(ref clean) = args.clean_output {
            self.output.clean_playlist = clean.clone();
        }
    }

    /// Priority of a display category (100 when unlisted).
    pub fn priority_of(&self, category: &str) -> i64 {
        crate::normalize::category_priority(category, &self.categories_priorities)
    }

    /// Generate the content of a starter settings file.
    pub fn default_template() -> String {
        let raw = default_raw_playlist();
        let clean = default_clean_playlist();

        format!(
            "# m3u-merge settings\n\
             # Lines starting with '#' are comments.\n\
             \n\
             [Sources]\n\
             # One playlist URL per line. The file name becomes the source label.\n\
             https://iptv-org.github.io/iptv/countries/fra.m3u\n\
             \n\
             [Categories Mapping]\n\
             # raw category = display category\n\
             Animation = Kids\n\
             Movies = Cinema\n\
             \n\
             [Categories Priorities]\n\
             # display category = priority (lower wins, unlisted = 100)\n\
             News = 1\n\
             Kids = 2\n\
             Cinema = 3\n\
             \n\
             [Regions]\n\
             # region prefix = display region\n\
             FRA = French\n\
             \n\
             [Output]\n\
             raw_playlist = {}\n\
             clean_playlist = {}\n",
            raw.display(),
            clean.display()
        )
    }
}
