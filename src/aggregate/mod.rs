//! Merge stage: fetch every source and combine them into one playlist.

pub mod fetcher;
pub mod merger;

pub use fetcher::{HttpFetcher, PlaylistFetcher};
pub use merger::{append_source, source_label};

use crate::config::Settings;
use crate::models::{AggregateOutcome, SourceOutcome};
use crate::playlist::HEADER;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Options for the merge stage.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Sources fetched at the same time (1 = sequential).
    pub concurrency: usize,
    /// Whether to show a progress bar.
    pub show_progress: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            show_progress: false,
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sources")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Line announcing a source, printed before it is fetched.
fn processing_line(url: &str) -> String {
    format!("   Processing: {} ({})", source_label(url), url)
}

/// Fetch every source and build the combined playlist.
///
/// Fetch failures are logged and recorded in the outcome; they never abort
/// the merge. Entries always appear in configured source order, whatever
/// the concurrency.
pub async fn aggregate(
    sources: &[String],
    fetcher: &dyn PlaylistFetcher,
    options: &AggregateOptions,
) -> AggregateOutcome {
    let progress = (options.show_progress && sources.len() > 1).then(|| progress_bar(sources.len()));

    let fetched: Vec<_> = stream::iter(sources)
        .map(|url| {
            let progress = progress.clone();
            async move {
                let line = processing_line(url);
                match progress {
                    Some(ref pb) => pb.println(line),
                    None => println!("{}", line),
                }
                let result = fetcher.fetch(url).await;
                if let Some(ref pb) = progress {
                    pb.inc(1);
                }
                (url, result)
            }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let mut outcome = AggregateOutcome {
        document: format!("{}\n", HEADER),
        sources: Vec::with_capacity(sources.len()),
    };

    for (url, result) in fetched {
        let label = source_label(url);

        match result {
            Ok(text) => {
                let entries = append_source(&mut outcome.document, &text, &label);
                debug!("{} contributed {} entries", label, entries);
                outcome.sources.push(SourceOutcome {
                    url: url.clone(),
                    label,
                    entries,
                    error: None,
                });
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                println!("   ⚠️  Failed to fetch {}: {}", url, e);
                outcome.sources.push(SourceOutcome {
                    url: url.clone(),
                    label,
                    entries: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    outcome
}

/// Run the merge stage and write the raw playlist.
pub async fn merge_playlists(
    settings: &Settings,
    fetcher: &dyn PlaylistFetcher,
    options: &AggregateOptions,
) -> Result<AggregateOutcome> {
    info!("Merging {} sources", settings.sources.len());

    let outcome = aggregate(&settings.sources, fetcher, options).await;

    let path = &settings.output.raw_playlist;
    std::fs::write(path, &outcome.document)
        .with_context(|| format!("Failed to write raw playlist: {}", path.display()))?;

    info!(
        "Wrote {} entries from {} sources to {}",
        outcome.total_entries(),
        outcome.sources.len() - outcome.failed_sources(),
        path.display()
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fetcher::StaticFetcher;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;

    const FRA: &str = "#EXTM3U\n\
                       #EXTINF:-1 group-title=\"News\",France 24\n\
                       http://f24\n";
    const NEWS: &str = "#EXTM3U\n\
                        #EXTINF:-1 tvg-id=\"cnn\",CNN\n\
                        http://cnn\n";

    fn sources() -> Vec<String> {
        vec![
            "https://lists/fra.m3u".to_string(),
            "https://lists/bel.m3u".to_string(),
            "https://lists/news.m3u".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_sources() {
        let fetcher = StaticFetcher::new(&[
            ("https://lists/fra.m3u", FRA),
            ("https://lists/news.m3u", NEWS),
        ]);

        let outcome = aggregate(&sources(), &fetcher, &AggregateOptions::default()).await;

        assert_eq!(outcome.total_entries(), 2);
        assert_eq!(outcome.failed_sources(), 1);
        assert_eq!(outcome.sources[1].label, "BEL");
        assert!(outcome.sources[1].error.is_some());
        assert_eq!(
            outcome.document,
            "#EXTM3U\n\
             #EXTINF:-1 group-title=\"FRA - News\",France 24\n\
             http://f24\n\
             #EXTINF:-1 group-title=\"NEWS\" tvg-id=\"cnn\",CNN\n\
             http://cnn\n"
        );
    }

    #[tokio::test]
    async fn test_concurrent_fetch_keeps_source_order() {
        let fetcher = StaticFetcher::new(&[
            ("https://lists/fra.m3u", FRA),
            ("https://lists/bel.m3u", FRA),
            ("https://lists/news.m3u", NEWS),
        ]);
        let sequential = aggregate(&sources(), &fetcher, &AggregateOptions::default()).await;
        let options = AggregateOptions {
            concurrency: 3,
            show_progress: false,
        };
        let concurrent = aggregate(&sources(), &fetcher, &options).await;

        assert_eq!(sequential.document, concurrent.document);
        assert_eq!(sequential.sources, concurrent.sources);
    }

    /// Answers after a per-URL delay, so later sources can finish first.
    struct DelayedFetcher {
        inner: StaticFetcher,
        delays_ms: Vec<(&'static str, u64)>,
    }

    #[async_trait]
    impl PlaylistFetcher for DelayedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let delay = self
                .delays_ms
                .iter()
                .find(|(u, _)| *u == url)
                .map_or(0, |(_, ms)| *ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.fetch(url).await
        }
    }

    #[tokio::test]
    async fn test_slow_first_source_still_comes_first() {
        let fetcher = DelayedFetcher {
            inner: StaticFetcher::new(&[
                ("https://lists/fra.m3u", FRA),
                ("https://lists/bel.m3u", FRA),
                ("https://lists/news.m3u", NEWS),
            ]),
            delays_ms: vec![
                ("https://lists/fra.m3u", 200),
                ("https://lists/bel.m3u", 100),
                ("https://lists/news.m3u", 10),
            ],
        };
        let options = AggregateOptions {
            concurrency: 3,
            show_progress: false,
        };

        let outcome = aggregate(&sources(), &fetcher, &options).await;

        let labels: Vec<&str> = outcome.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["FRA", "BEL", "NEWS"]);

        let fra = outcome.document.find("FRA - News").unwrap();
        let bel = outcome.document.find("BEL - News").unwrap();
        let news = outcome.document.find("group-title=\"NEWS\"").unwrap();
        assert!(fra < bel && bel < news);
    }

    #[test]
    fn test_processing_line() {
        assert_eq!(
            processing_line("https://lists/fra.m3u"),
            "   Processing: FRA (https://lists/fra.m3u)"
        );
    }

    #[tokio::test]
    async fn test_all_sources_failing_gives_header_only() {
        let fetcher = StaticFetcher::new(&[]);
        let outcome = aggregate(&sources(), &fetcher, &AggregateOptions::default()).await;
        assert_eq!(outcome.document, "#EXTM3U\n");
        assert_eq!(outcome.failed_sources(), 3);
    }

    #[tokio::test]
    async fn test_merge_playlists_writes_raw_playlist() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.sources = sources();
        settings.output.raw_playlist = temp_dir.path().join("playlist.m3u");

        let fetcher = StaticFetcher::new(&[
            ("https://lists/fra.m3u", include_str!("../../fixtures/fra.m3u")),
            ("https://lists/news.m3u", NEWS),
        ]);

        let outcome = merge_playlists(&settings, &fetcher, &AggregateOptions::default())
            .await
            .unwrap();

        let written = std::fs::read_to_string(&settings.output.raw_playlist).unwrap();
        assert_eq!(written, outcome.document);
        assert_eq!(outcome.total_entries(), 6);
        assert!(written.contains("group-title=\"FRA - Animation;Kids\""));
        assert!(written.contains("#EXTINF:0 group-title=\"FRA\" 0,Arte (576p)"));
        assert!(!written.contains("Broken Channel"));
    }
}
