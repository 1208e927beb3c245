//! Command-line interface definitions for News Sweep.
//!
//! The three search inputs mirror what a task runner supplies; the remaining
//! flags override the output location and browser connection from the
//! settings file.

use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;

/// Search a news feed, keep recent matches, and export them to a workbook.
///
/// # Examples
///
/// ```sh
/// # Articles mentioning "inflation" from the last three months
/// news_sweep --search-phrase inflation --months 3
///
/// # A category search against a headless browser
/// news_sweep --category economy --headless
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text phrase to search for; takes priority over --category
    #[arg(short, long)]
    pub search_phrase: Option<String>,

    /// Category to search when no phrase is given
    #[arg(long)]
    pub category: Option<String>,

    /// How many months back to keep articles (0 = this month only)
    #[arg(short, long, default_value_t = 1)]
    pub months: u32,

    /// Directory for the workbook and the images folder
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Workbook name without extension
    #[arg(long)]
    pub file_name: Option<String>,

    /// WebDriver server to drive the browser through
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Optional path to a settings YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Let explicit flags win over the settings file.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(name) = &self.file_name {
            settings.file_name = name.clone();
        }
        if let Some(url) = &self.webdriver_url {
            settings.webdriver_url = url.clone();
        }
        if self.headless {
            settings.headless = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_sweep"]);
        assert_eq!(cli.search_phrase, None);
        assert_eq!(cli.category, None);
        assert_eq!(cli.months, 1);
        assert!(!cli.headless);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_sweep", "-s", "inflation", "-m", "6", "-o", "/tmp/out"]);
        assert_eq!(cli.search_phrase.as_deref(), Some("inflation"));
        assert_eq!(cli.months, 6);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "news_sweep",
            "--category",
            "economy",
            "--file-name",
            "economy_news",
            "--webdriver-url",
            "http://127.0.0.1:4444",
            "--headless",
        ]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(cli.category.as_deref(), Some("economy"));
        assert_eq!(settings.file_name, "economy_news");
        assert_eq!(settings.webdriver_url, "http://127.0.0.1:4444");
        assert!(settings.headless);
        assert_eq!(settings.output_dir, PathBuf::from("output"));
    }
}
