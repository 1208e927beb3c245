//! Data models that flow through a sweep.
//!
//! - [`SearchTarget`]: what the feed is searched for
//! - [`ArticleRecord`]: one article as scraped from the feed
//! - [`RecencyThreshold`]: the oldest month still worth keeping
//! - [`ExportRow`]: one spreadsheet row
//!
//! Records are plain owned values. The collector produces them, the exporter
//! consumes them once, and nothing holds on to them afterwards.

use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Query term used when neither a phrase nor a category was supplied.
pub const DEFAULT_SEARCH_TERM: &str = "breaking";

/// The thing a feed is searched for.
///
/// A non-blank phrase wins over a category; with neither, the feed falls back
/// to [`DEFAULT_SEARCH_TERM`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    Phrase(String),
    Category(String),
    Breaking,
}

impl SearchTarget {
    pub fn new(category: Option<&str>, search_phrase: Option<&str>) -> Self {
        let non_blank = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let Some(phrase) = non_blank(search_phrase) {
            SearchTarget::Phrase(phrase)
        } else if let Some(category) = non_blank(category) {
            SearchTarget::Category(category)
        } else {
            SearchTarget::Breaking
        }
    }

    /// The term placed in the search URL.
    pub fn query(&self) -> &str {
        match self {
            SearchTarget::Phrase(p) => p,
            SearchTarget::Category(c) => c,
            SearchTarget::Breaking => DEFAULT_SEARCH_TERM,
        }
    }

    /// The phrase whose occurrences are counted per article, if any.
    pub fn phrase(&self) -> Option<&str> {
        match self {
            SearchTarget::Phrase(p) => Some(p),
            _ => None,
        }
    }
}

/// One article summary scraped from the feed.
///
/// Two records with identical fields are the same article.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleRecord {
    /// Either a relative time ("3 days ago") or an absolute date ("Jul 15, 2023").
    pub published_time: String,
    pub title: String,
    pub description: String,
    /// Case-insensitive occurrences of the search phrase in title + description.
    pub phrase_count: usize,
    pub image_url: String,
}

/// Calendar month before which articles are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyThreshold {
    /// 1..=12
    pub month: u32,
    pub year: i32,
}

impl RecencyThreshold {
    /// The calendar month `months` months before `today`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let july = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
    /// let t = RecencyThreshold::months_before(july, 15);
    /// assert_eq!((t.month, t.year), (4, 2023));
    /// ```
    pub fn months_before(today: NaiveDate, months: u32) -> Self {
        let mut month = today.month() as i64 - months as i64;
        let mut year = today.year() as i64;

        if month <= 0 {
            let years_back = month.abs() / 12 + 1;
            year -= years_back;
            month += 12 * years_back;
        }

        Self {
            month: month as u32,
            year: year as i32,
        }
    }

    pub fn from_now(months: u32) -> Self {
        Self::months_before(Local::now().date_naive(), months)
    }

    /// Whether an article published in `(year, month)` is recent enough.
    pub fn admits(&self, year: i32, month: u32) -> bool {
        (year, month) >= (self.year, self.month)
    }
}

impl fmt::Display for RecencyThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One spreadsheet row, in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_filename: String,
    pub phrase_count: usize,
    pub has_amount: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_phrase_wins_over_category() {
        let target = SearchTarget::new(Some("economy"), Some("inflation"));
        assert_eq!(target, SearchTarget::Phrase("inflation".to_string()));
        assert_eq!(target.query(), "inflation");
        assert_eq!(target.phrase(), Some("inflation"));
    }

    #[test]
    fn test_category_when_phrase_blank() {
        let target = SearchTarget::new(Some("economy"), Some("   "));
        assert_eq!(target, SearchTarget::Category("economy".to_string()));
        assert_eq!(target.phrase(), None);
    }

    #[test]
    fn test_default_term() {
        let target = SearchTarget::new(None, None);
        assert_eq!(target, SearchTarget::Breaking);
        assert_eq!(target.query(), "breaking");
    }

    #[test]
    fn test_threshold_rolls_back_across_years() {
        let t = RecencyThreshold::months_before(ymd(2024, 7, 10), 15);
        assert_eq!((t.month, t.year), (4, 2023));
    }

    #[test]
    fn test_threshold_matches_calendar_subtraction() {
        let today = ymd(2024, 7, 10);
        for n in 0..60u32 {
            let t = RecencyThreshold::months_before(today, n);
            let expected = today.checked_sub_months(chrono::Months::new(n)).unwrap();
            assert_eq!(
                (t.month, t.year),
                (expected.month(), expected.year()),
                "lookback {n}"
            );
        }
    }

    #[test]
    fn test_threshold_edge_months() {
        assert_eq!(RecencyThreshold::months_before(ymd(2024, 7, 1), 0).month, 7);
        let dec = RecencyThreshold::months_before(ymd(2024, 12, 1), 12);
        assert_eq!((dec.month, dec.year), (12, 2023));
        let jan = RecencyThreshold::months_before(ymd(2024, 1, 31), 1);
        assert_eq!((jan.month, jan.year), (12, 2023));
    }

    #[test]
    fn test_admits_compares_year_then_month() {
        let t = RecencyThreshold { month: 6, year: 2023 };
        assert!(t.admits(2023, 6));
        assert!(t.admits(2024, 1));
        assert!(!t.admits(2023, 5));
        assert!(!t.admits(2022, 12));
    }

    #[test]
    fn test_article_records_compare_by_all_fields() {
        let a = ArticleRecord {
            published_time: "2 hours ago".to_string(),
            title: "Title".to_string(),
            description: "Desc".to_string(),
            phrase_count: 1,
            image_url: "https://example.com/a.jpg".to_string(),
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.phrase_count = 2;
        assert_ne!(a, b);
    }
}
