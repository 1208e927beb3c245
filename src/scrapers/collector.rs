//! Pagination loop over a search feed.
//!
//! The feed is sorted newest first, so the first article older than the
//! recency threshold marks the end of the useful range: collection stops
//! there without loading further pages.
//!
//! Each pass reads every rendered article, scans the ones not seen in earlier
//! passes, and then asks the page for more. Session failures are retried with
//! backoff up to the policy's limit; after that the collector returns what it
//! already has.

use super::FeedSession;
use super::extract::ArticleExtractor;
use crate::dates::is_within_window;
use crate::error::SessionError;
use crate::models::{ArticleRecord, RecencyThreshold};
use crate::retry::RetryPolicy;
use crate::utils::{count_occurrences, normalize_whitespace, truncate_for_log};
use itertools::Itertools;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Why collection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The search summary reported zero results.
    NoResults,
    /// An article older than the threshold was reached.
    ReachedStale,
    /// The page had no "show more" control left.
    FeedExhausted,
    /// The configured page cap was hit.
    PageLimit,
    /// Session errors outlasted the retry budget.
    RetriesExhausted,
}

#[derive(Debug)]
pub struct Collection {
    /// Deduplicated, in first-seen order.
    pub records: Vec<ArticleRecord>,
    pub stop: StopReason,
    /// Pages loaded, counting the first.
    pub pages: usize,
}

#[derive(Debug, Clone)]
pub struct CollectOptions<'a> {
    pub threshold: RecencyThreshold,
    /// Phrase counted per article; `None` counts nothing.
    pub phrase: Option<&'a str>,
    pub no_results_text: &'a str,
    pub retry: RetryPolicy,
    pub settle: Duration,
    pub max_pages: Option<usize>,
}

/// Outcome of scanning one article node.
#[derive(Debug)]
enum Scan {
    Keep(ArticleRecord),
    Stale,
    Skip(String),
}

/// Outcome of one pass over the rendered feed.
#[derive(Debug, PartialEq, Eq)]
enum BatchOutcome {
    LoadedMore,
    Stopped(StopReason),
}

/// Collect every in-window article from the feed at `url`.
#[instrument(level = "info", skip(session, extractor, opts), fields(threshold = %opts.threshold))]
pub async fn collect<S: FeedSession>(
    session: &mut S,
    url: &str,
    extractor: &ArticleExtractor,
    opts: &CollectOptions<'_>,
) -> Result<Collection, SessionError> {
    open_page(session, url, &opts.retry).await?;

    match session.result_summary().await {
        Ok(Some(summary)) if reports_no_results(&summary, opts.no_results_text) => {
            info!(%summary, "Search returned no results");
            return Ok(Collection {
                records: Vec::new(),
                stop: StopReason::NoResults,
                pages: 1,
            });
        }
        Ok(summary) => debug!(?summary, "Search summary"),
        Err(e) => warn!(error = %e, "Could not read search summary; scanning anyway"),
    }

    let mut records = Vec::new();
    let mut processed = 0usize;
    let mut pages = 1usize;
    let mut failures = 0usize;

    let stop = loop {
        match next_batch(session, extractor, opts, pages, &mut processed, &mut records).await {
            Ok(BatchOutcome::LoadedMore) => {
                failures = 0;
                pages += 1;
                debug!(pages, kept = records.len(), "Loaded another page");
            }
            Ok(BatchOutcome::Stopped(reason)) => break reason,
            Err(e) => {
                failures += 1;
                if failures > opts.retry.max_retries() {
                    warn!(
                        failures,
                        error = %e,
                        kept = records.len(),
                        "Feed kept failing; returning what was collected"
                    );
                    break StopReason::RetriesExhausted;
                }
                let delay = opts.retry.backoff(failures);
                warn!(failures, ?delay, error = %e, "Feed pass failed; retrying");
                sleep(delay).await;
            }
        }
    };

    let records: Vec<ArticleRecord> = records.into_iter().unique().collect();
    info!(count = records.len(), pages, ?stop, "Collected articles");

    Ok(Collection {
        records,
        stop,
        pages,
    })
}

async fn open_page<S: FeedSession>(
    session: &mut S,
    url: &str,
    retry: &RetryPolicy,
) -> Result<(), SessionError> {
    let mut attempt = 0usize;
    loop {
        match session.open(url).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retry.max_retries() => {
                attempt += 1;
                let delay = retry.backoff(attempt);
                warn!(attempt, ?delay, error = %e, "Opening search page failed; retrying");
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Scan the articles rendered since the last pass, then load more if
/// everything was in-window.
async fn next_batch<S: FeedSession>(
    session: &mut S,
    extractor: &ArticleExtractor,
    opts: &CollectOptions<'_>,
    pages: usize,
    processed: &mut usize,
    records: &mut Vec<ArticleRecord>,
) -> Result<BatchOutcome, SessionError> {
    let fragments = session.article_fragments().await?;
    if fragments.len() < *processed {
        // the page re-rendered from scratch
        *processed = 0;
    }

    for (index, html) in fragments.iter().enumerate().skip(*processed) {
        *processed = index + 1;
        match scan_article(html, extractor, opts) {
            Scan::Keep(record) => {
                debug!(index, title = %truncate_for_log(&record.title, 80), "Kept article");
                records.push(record);
            }
            Scan::Stale => {
                info!(index, "Reached an article older than the threshold");
                return Ok(BatchOutcome::Stopped(StopReason::ReachedStale));
            }
            Scan::Skip(reason) => warn!(index, %reason, "Skipping malformed article"),
        }
    }

    if opts.max_pages.is_some_and(|max| pages >= max) {
        return Ok(BatchOutcome::Stopped(StopReason::PageLimit));
    }

    if session.show_more().await? {
        sleep(opts.settle).await;
        Ok(BatchOutcome::LoadedMore)
    } else {
        Ok(BatchOutcome::Stopped(StopReason::FeedExhausted))
    }
}

fn scan_article(html: &str, extractor: &ArticleExtractor, opts: &CollectOptions<'_>) -> Scan {
    let fields = match extractor.extract(html) {
        Ok(fields) => fields,
        Err(e) => return Scan::Skip(e.to_string()),
    };

    match is_within_window(&fields.published_time, &opts.threshold) {
        Ok(true) => {}
        Ok(false) => return Scan::Stale,
        Err(e) => return Scan::Skip(e.to_string()),
    }

    let phrase_count = opts
        .phrase
        .map(|p| count_occurrences(p, &[fields.title.as_str(), fields.description.as_str()]))
        .unwrap_or(0);

    Scan::Keep(ArticleRecord {
        published_time: fields.published_time,
        title: fields.title,
        description: fields.description,
        phrase_count,
        image_url: fields.image_url,
    })
}

fn reports_no_results(summary: &str, no_results_text: &str) -> bool {
    normalize_whitespace(summary).eq_ignore_ascii_case(no_results_text.trim())
}
