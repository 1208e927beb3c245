//! Text helpers and file system checks shared by the collector and exporter.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Case-insensitive, non-overlapping occurrences of `needle` across `texts`.
///
/// An empty needle matches nothing.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(count_occurrences("gas", &["Gas prices", "gasoline and GAS"]), 3);
/// ```
pub fn count_occurrences(needle: &str, texts: &[&str]) -> usize {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    texts
        .iter()
        .map(|text| text.to_lowercase().matches(needle.as_str()).count())
        .sum()
}

/// Whether any keyword appears in any text, ignoring case.
pub fn contains_any_keyword<S: AsRef<str>>(keywords: &[S], texts: &[&str]) -> bool {
    let texts: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();
    keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .filter(|k| !k.is_empty())
        .any(|k| texts.iter().any(|t| t.contains(&k)))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove the feed's `...` truncation markers.
pub fn strip_ellipsis(s: &str) -> String {
    s.replace("...", "").trim().to_string()
}

/// Truncate a string for logging, appending how many bytes were cut.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_occurrences_ignores_case() {
        assert_eq!(
            count_occurrences("Inflation", &["INFLATION hits", "inflation and inflation"]),
            3
        );
        assert_eq!(count_occurrences("gas", &["nothing here"]), 0);
        assert_eq!(count_occurrences("", &["anything"]), 0);
    }

    #[test]
    fn test_contains_any_keyword() {
        let keywords = ["dollar", "$", "price"];
        assert!(contains_any_keyword(&keywords, &["Dollar prices surge", ""]));
        assert!(contains_any_keyword(&keywords, &["Weather", "cost is $5"]));
        assert!(!contains_any_keyword(&keywords, &["Weather update", "Rain tomorrow"]));
        assert!(!contains_any_keyword::<&str>(&[], &["Dollar"]));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n  b\tc "), "a b c");
    }

    #[test]
    fn test_strip_ellipsis() {
        assert_eq!(strip_ellipsis("Markets fall as ..."), "Markets fall as");
        assert_eq!(strip_ellipsis("No markers"), "No markers");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 100), "short");
        let long = "a".repeat(500);
        let result = truncate_for_log(&long, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let result = truncate_for_log("ééé", 3);
        assert_eq!(result, "é…(+4 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
