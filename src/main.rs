//! m3u-merge - IPTV playlist aggregator
//!
//! A CLI tool that merges remote M3U playlists into one combined
//! playlist, then cleans it into a sorted, categorized playlist.
//!
//! Exit codes:
//!   0 - Success (including runs where some sources failed to fetch)
//!   1 - Aborted (missing settings, no sources, invalid priority, I/O error)

mod aggregate;
mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod playlist;
mod report;

use aggregate::{AggregateOptions, HttpFetcher};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::Settings;
use models::RunReport;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args.settings);
    }

    init_logging(&args);

    info!("m3u-merge v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run aborted: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a starter settings file.
fn handle_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, Settings::default_template())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to list your playlist sources, categories and regions.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the configured stages.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    info!(
        "Running stage '{}' with settings from: {}",
        args.stage,
        args.settings.display()
    );
    let mut settings = Settings::load(&args.settings)?;
    settings.merge_with_args(&args);

    if args.dry_run {
        return handle_dry_run(&settings);
    }

    // Step 1: merge the sources
    let mut sources = Vec::new();
    let mut raw_entries = 0;

    if args.stage.merges() {
        settings.require_sources(&args.settings)?;

        println!(
            "📥 Found {} playlists in {}...",
            settings.sources.len(),
            args.settings.display()
        );

        let fetcher = HttpFetcher::new(args.timeout)?;
        let options = AggregateOptions {
            concurrency: args.concurrency,
            show_progress: !args.quiet,
        };

        let outcome = aggregate::merge_playlists(&settings, &fetcher, &options).await?;
        raw_entries = outcome.total_entries();
        sources = outcome.sources;

        println!(
            "✅ Merged playlist saved to {}",
            settings.output.raw_playlist.display()
        );
    }

    // Step 2: clean the merged playlist
    let clean = if args.stage.cleans() {
        println!("\n🧹 Cleaning playlist...");
        let outcome = normalize::clean_playlist(
            &settings.output.raw_playlist,
            &settings.output.clean_playlist,
            &settings,
        )?;
        println!(
            "✅ Cleaned playlist saved to {}",
            settings.output.clean_playlist.display()
        );
        Some(outcome)
    } else {
        None
    };

    let run_report = RunReport {
        generated_at: Utc::now(),
        stage: args.stage,
        sources,
        raw_entries,
        clean,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    println!("\n📊 Summary:");
    println!(
        "{}",
        report::generate_summary_text(&run_report, &settings.output)
    );

    if let Some(ref path) = args.report {
        report::write_json_report(&run_report, path)?;
        println!("\n📝 Report saved to: {}", path.display());
    }

    Ok(())
}

/// Handle --dry-run: list sources with their labels, fetch nothing.
fn handle_dry_run(settings: &Settings) -> Result<()> {
    println!("\n🔍 Dry run: listing sources (nothing is fetched)...\n");

    if settings.sources.is_empty() {
        println!("   No sources configured.");
    } else {
        for url in &settings.sources {
            println!("     📄 {} <- {}", aggregate::source_label(url), url);
        }
        println!("\n   Total: {} sources", settings.sources.len());
    }

    println!("   Merged playlist: {}", settings.output.raw_playlist.display());
    println!("   Clean playlist: {}", settings.output.clean_playlist.display());
    println!(
        "   Mappings: {} categories, {} priorities, {} regions",
        settings.categories_mapping.len(),
        settings.categories_priorities.len(),
        settings.regions.len()
    );

    println!("\n✅ Dry run complete. Nothing was written.");
    Ok(())
}
