//! Feed scraping.
//!
//! The scrape is split between a live page and pure extraction:
//!
//! | Piece | Module | Role |
//! |-------|--------|------|
//! | [`FeedSession`] | this module | What the collector needs from a browser page |
//! | [`webdriver::WebDriverSession`] | [`webdriver`] | `FeedSession` over a W3C WebDriver server |
//! | [`extract::ArticleExtractor`] | [`extract`] | Title / time / description / image from one article's HTML |
//! | [`collector::collect`] | [`collector`] | Pagination loop with recency cutoff and dedup |
//!
//! The session is passed to the collector explicitly, so tests drive the
//! collector with a scripted page instead of a browser.

pub mod collector;
pub mod extract;
pub mod webdriver;

use crate::error::SessionError;

/// A live, paginated search results page.
pub trait FeedSession {
    /// Navigate to `url` and wait for the result list to render.
    async fn open(&mut self, url: &str) -> Result<(), SessionError>;

    /// Text of the search summary ("About 12 results"), if the page shows one.
    async fn result_summary(&mut self) -> Result<Option<String>, SessionError>;

    /// Outer HTML of every article currently rendered, in DOM order.
    async fn article_fragments(&mut self) -> Result<Vec<String>, SessionError>;

    /// Scroll down and click the "show more" control.
    ///
    /// Returns `false` when the page has no such control, i.e. the feed is
    /// exhausted.
    async fn show_more(&mut self) -> Result<bool, SessionError>;
}
