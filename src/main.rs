//! # News Sweep
//!
//! Searches a news site's results feed, keeps the articles published within a
//! look-back window, and exports them to an `.xlsx` workbook together with
//! their thumbnail images.
//!
//! ## Usage
//!
//! ```sh
//! chromedriver --port=9515 &
//! news_sweep --search-phrase inflation --months 2 --headless
//! ```
//!
//! ## Pipeline
//!
//! One run, start to finish:
//! 1. **Query**: phrase, else category, else "breaking" → search URL
//! 2. **Collect**: drive the feed in a browser, paging with "show more" until
//!    an article falls outside the window
//! 3. **Export**: resolve dates, flag money mentions, download thumbnails,
//!    write the workbook once

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod error;
mod models;
mod outputs;
mod query;
mod retry;
mod scrapers;
mod utils;

use cli::Cli;
use config::Settings;
use models::{RecencyThreshold, SearchTarget};
use outputs::export_records;
use outputs::images::ImageFetcher;
use query::build_search_url;
use scrapers::collector::{CollectOptions, collect};
use scrapers::extract::ArticleExtractor;
use scrapers::webdriver::WebDriverSession;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("news_sweep starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // --- Settings ---
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    args.apply_to(&mut settings);
    settings.validate()?;

    if let Err(e) = ensure_writable_dir(&settings.output_dir).await {
        error!(
            path = %settings.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // --- Query ---
    let target = SearchTarget::new(args.category.as_deref(), args.search_phrase.as_deref());
    let url = build_search_url(&settings.base_url, &target);
    let threshold = RecencyThreshold::from_now(args.months);
    info!(%url, %threshold, months = args.months, "Search prepared");

    // --- Collect ---
    let extractor = ArticleExtractor::new(&settings.feed, &settings.base_url)?;
    let opts = CollectOptions {
        threshold,
        phrase: target.phrase(),
        no_results_text: &settings.feed.no_results_text,
        retry: settings.retry.policy(),
        settle: Duration::from_millis(settings.settle_ms),
        max_pages: settings.max_pages,
    };

    let mut session = WebDriverSession::start(
        &settings.webdriver_url,
        settings.headless,
        settings.feed.clone(),
        Duration::from_millis(settings.page_load_timeout_ms),
    )
    .await?;
    let collected = collect(&mut session, &url, &extractor, &opts).await;
    if let Err(e) = session.quit().await {
        warn!(error = %e, "Failed to close browser session");
    }
    let collection = collected?;
    info!(
        count = collection.records.len(),
        pages = collection.pages,
        stop = ?collection.stop,
        "Collection finished"
    );

    // --- Export ---
    let fetcher = ImageFetcher::new(
        Duration::from_secs(settings.download_timeout_secs),
        settings.retry.policy(),
    )?;
    let summary = export_records(
        &collection.records,
        &settings,
        &fetcher,
        Local::now().naive_local(),
    )
    .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        path = %summary.path.display(),
        rows = summary.rows,
        skipped = summary.skipped,
        images_failed = summary.images_failed,
        "Execution complete"
    );

    Ok(())
}
