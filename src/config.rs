//! Run settings.
//!
//! Everything here has a working default, so a settings file is optional. When
//! one is given (`--config settings.yaml`) any subset of the fields may be set:
//!
//! ```yaml
//! base_url: "https://www.aljazeera.com/"
//! monetary_keywords: ["$", "dollar", "price"]
//! max_pages: 20
//! retry:
//!   max_retries: 3
//!   base_delay_ms: 500
//! ```

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.aljazeera.com/";

/// CSS / XPath selectors describing the feed's markup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedSelectors {
    /// Element holding the "About N results" text.
    pub summary_class: String,
    /// Container of the result list; waited for after navigation.
    pub list_class: String,
    pub article_tag: String,
    pub title_tag: String,
    pub summary_tag: String,
    pub image_tag: String,
    pub show_more_xpath: String,
    /// Summary text meaning the search found nothing.
    pub no_results_text: String,
}

impl Default for FeedSelectors {
    fn default() -> Self {
        Self {
            summary_class: "search-summary__query".to_string(),
            list_class: "search-result__list".to_string(),
            article_tag: "article".to_string(),
            title_tag: "h3".to_string(),
            summary_tag: "p".to_string(),
            image_tag: "img".to_string(),
            show_more_xpath: r#"//button[@class="show-more-button grid-full-width" and @data-testid="show-more-button"]"#
                .to_string(),
            no_results_text: "About 0 results".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            jitter_ms: 250,
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_jitter(Duration::from_millis(self.jitter_ms))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Site root, with trailing slash.
    pub base_url: String,
    /// Case-insensitive terms that mark an article as mentioning money.
    pub monetary_keywords: Vec<String>,
    pub output_dir: PathBuf,
    /// Workbook name without extension.
    pub file_name: String,
    pub images_subdir: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub feed: FeedSelectors,
    pub retry: RetrySettings,
    /// Pause after clicking "show more" so the next batch can render.
    pub settle_ms: u64,
    /// How long to wait for the result list after navigation.
    pub page_load_timeout_ms: u64,
    /// Stop paginating after this many pages, if set.
    pub max_pages: Option<usize>,
    pub download_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            monetary_keywords: [
                "$", "dollar", "usd", "price", "cost", "million", "billion", "trillion",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            output_dir: PathBuf::from("output"),
            file_name: "news_list".to_string(),
            images_subdir: "news_images".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            feed: FeedSelectors::default(),
            retry: RetrySettings::default(),
            settle_ms: 1_500,
            page_load_timeout_ms: 15_000,
            max_pages: None,
            download_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; missing fields keep their defaults.
    #[instrument(level = "info")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        settings.validate()?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", self.base_url)))?;
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("file_name is empty".to_string()));
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::Invalid("max_pages must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.xlsx", self.file_name))
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(&self.images_subdir)
    }
}
