//! Export of collected articles.
//!
//! # Submodules
//!
//! - [`spreadsheet`]: the `.xlsx` workbook
//! - [`images`]: thumbnail downloads
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_list.xlsx
//! └── news_images/
//!     ├── 3f9a0c12.jpg
//!     └── 7be41d07.png
//! ```
//!
//! A row whose published time cannot be resolved is skipped. A thumbnail that
//! fails to download leaves its row in place with the bare image id.

pub mod images;
pub mod spreadsheet;

use crate::config::Settings;
use crate::dates::resolve_date;
use crate::error::{DateError, ExportError};
use crate::models::{ArticleRecord, ExportRow};
use crate::utils::{contains_any_keyword, strip_ellipsis};
use chrono::NaiveDateTime;
use images::ImageFetcher;
use spreadsheet::SpreadsheetWriter;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    /// Records dropped because their date could not be resolved.
    pub skipped: usize,
    pub images_saved: usize,
    pub images_failed: usize,
}

/// Short random identifier used as an image's base filename.
pub fn new_image_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Turn a record into a spreadsheet row.
pub fn build_row(
    record: &ArticleRecord,
    keywords: &[String],
    image_id: &str,
    now: NaiveDateTime,
) -> Result<ExportRow, DateError> {
    let date = resolve_date(&record.published_time, now)?;
    let title = strip_ellipsis(&record.title);
    let description = strip_ellipsis(&record.description);
    let has_amount = contains_any_keyword(keywords, &[title.as_str(), description.as_str()]);

    Ok(ExportRow {
        title,
        date,
        description,
        image_filename: image_id.to_string(),
        phrase_count: record.phrase_count,
        has_amount,
    })
}

/// Write `records` to the workbook and their thumbnails to the images directory.
#[instrument(level = "info", skip_all, fields(count = records.len()))]
pub async fn export_records(
    records: &[ArticleRecord],
    settings: &Settings,
    fetcher: &ImageFetcher,
    now: NaiveDateTime,
) -> Result<ExportSummary, ExportError> {
    let images_dir = settings.images_dir();
    fs::create_dir_all(&images_dir).await?;

    let mut summary = ExportSummary {
        path: settings.workbook_path(),
        ..Default::default()
    };
    let mut sheet = SpreadsheetWriter::new()?;

    for record in records {
        let image_id = new_image_id();
        let mut row = match build_row(record, &settings.monetary_keywords, &image_id, now) {
            Ok(row) => row,
            Err(e) => {
                error!(error = %e, title = %record.title, "Cannot resolve article date; skipping row");
                summary.skipped += 1;
                continue;
            }
        };

        if record.image_url.is_empty() {
            debug!(title = %row.title, "Article has no image");
        } else {
            match fetcher.download(&record.image_url, &images_dir, &image_id).await {
                Ok(path) => {
                    if let Some(name) = path.file_name() {
                        row.image_filename = name.to_string_lossy().into_owned();
                    }
                    summary.images_saved += 1;
                }
                Err(e) => {
                    warn!(error = %e, url = %record.image_url, "Image download failed; row kept without image");
                    summary.images_failed += 1;
                }
            }
        }

        sheet.append(&row)?;
    }

    summary.rows = sheet.rows();
    sheet.save(&summary.path)?;
    info!(
        path = %summary.path.display(),
        rows = summary.rows,
        skipped = summary.skipped,
        images_saved = summary.images_saved,
        images_failed = summary.images_failed,
        "Export complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn record(time: &str, title: &str, description: &str, image_url: &str) -> ArticleRecord {
        ArticleRecord {
            published_time: time.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            phrase_count: 1,
            image_url: image_url.to_string(),
        }
    }

    fn keywords() -> Vec<String> {
        Settings::default().monetary_keywords
    }

    #[test]
    fn test_image_id_is_eight_hex_chars() {
        let id = new_image_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_image_id(), new_image_id());
    }

    #[test]
    fn test_build_row_flags_money() {
        let row = build_row(
            &record("3 days ago", "Dollar prices surge", "Markets react ...", ""),
            &keywords(),
            "ab12cd34",
            now(),
        )
        .unwrap();
        assert!(row.has_amount);
        assert_eq!(row.date, "Jan 07, 2025");
        assert_eq!(row.description, "Markets react");
        assert_eq!(row.image_filename, "ab12cd34");
        assert_eq!(row.phrase_count, 1);
    }

    #[test]
    fn test_build_row_without_money() {
        let row = build_row(
            &record("Jul 15, 2023", "Weather update", "Rain expected", ""),
            &keywords(),
            "ab12cd34",
            now(),
        )
        .unwrap();
        assert!(!row.has_amount);
        assert_eq!(row.date, "Jul 15, 2023");
    }

    #[test]
    fn test_build_row_rejects_bad_relative_date() {
        let err = build_row(&record("ages ago", "T", "D", ""), &keywords(), "x", now()).unwrap_err();
        assert!(matches!(err, DateError::UnrecognizedRelative(_)));
    }

    #[tokio::test]
    async fn test_export_keeps_rows_when_images_fail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ok.jpg");
                then.status(200).header("Content-Type", "image/jpeg").body("jpeg");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/broken.jpg");
                then.status(500);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let fetcher = ImageFetcher::new(Duration::from_secs(5), RetryPolicy::immediate(0)).unwrap();
        let records = vec![
            record("1 hour ago", "Price of oil", "Up", &server.url("/ok.jpg")),
            record("2 hours ago", "Broken image", "Down", &server.url("/broken.jpg")),
            record("5 fortnights ago", "Bad date", "Dropped", ""),
            record("Jul 15, 2023", "No image", "Kept", ""),
        ];

        let summary = export_records(&records, &settings, &fetcher, now()).await.unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.images_saved, 1);
        assert_eq!(summary.images_failed, 1);
        assert_eq!(summary.path, dir.path().join("news_list.xlsx"));
        assert!(summary.path.exists());

        let saved: Vec<_> = std::fs::read_dir(settings.images_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].ends_with(".jpg"));
    }
}
