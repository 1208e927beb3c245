//! Interpreting the feed's published-time strings.
//!
//! The feed shows either a relative time ("3 days ago") for fresh articles or
//! an absolute date ("Jul 15, 2023") for older ones.

use crate::error::DateError;
use crate::models::RecencyThreshold;
use chrono::{Duration, Months, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Output format for resolved dates, e.g. `Jan 07, 2025`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static RELATIVE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d+|an?)\s+([a-z]+)\s+ago\s*$").unwrap());

pub fn is_relative(raw: &str) -> bool {
    raw.contains("ago")
}

/// Month number (1..=12) for a month name, judged by its first three letters.
fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.trim().chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

/// Split `"Mon DD, YYYY"` into `(year, month)`.
pub fn parse_year_month(raw: &str) -> Result<(i32, u32), DateError> {
    let invalid = || DateError::InvalidAbsolute(raw.to_string());

    let (month_day, year_part) = raw.split_once(',').ok_or_else(invalid)?;
    let month = month_number(month_day).ok_or_else(invalid)?;

    let year_part = year_part.trim();
    let digits = year_part
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| &year_part[i..])
        .ok_or_else(invalid)?;
    let year = digits.parse::<i32>().map_err(|_| invalid())?;

    Ok((year, month))
}

/// Whether an article published at `raw` falls inside the window.
///
/// Relative times always pass; the feed only uses them for recent articles.
pub fn is_within_window(raw: &str, threshold: &RecencyThreshold) -> Result<bool, DateError> {
    if is_relative(raw) {
        return Ok(true);
    }
    let (year, month) = parse_year_month(raw)?;
    Ok(threshold.admits(year, month))
}

/// Resolve `"<N> <unit> ago"` against `now`, formatted with [`DATE_FORMAT`].
pub fn calculate_past_date(raw: &str, now: NaiveDateTime) -> Result<String, DateError> {
    let caps = RELATIVE_TIME
        .captures(raw)
        .ok_or_else(|| DateError::UnrecognizedRelative(raw.to_string()))?;

    let amount: i64 = match caps[1].to_lowercase().as_str() {
        "a" | "an" => 1,
        n => n
            .parse()
            .map_err(|_| DateError::OutOfRange(raw.to_string()))?,
    };

    let unit = caps[2].to_lowercase();
    let singular = unit.strip_suffix('s').unwrap_or(&unit);
    let out_of_range = || DateError::OutOfRange(raw.to_string());

    let past = match singular {
        "second" => now.checked_sub_signed(Duration::try_seconds(amount).ok_or_else(out_of_range)?),
        "minute" => now.checked_sub_signed(Duration::try_minutes(amount).ok_or_else(out_of_range)?),
        "hour" => now.checked_sub_signed(Duration::try_hours(amount).ok_or_else(out_of_range)?),
        "day" => now.checked_sub_signed(Duration::try_days(amount).ok_or_else(out_of_range)?),
        "week" => now.checked_sub_signed(Duration::try_weeks(amount).ok_or_else(out_of_range)?),
        "month" => {
            let months = u32::try_from(amount).map_err(|_| out_of_range())?;
            now.checked_sub_months(Months::new(months))
        }
        "year" => {
            let months = u32::try_from(amount)
                .ok()
                .and_then(|y| y.checked_mul(12))
                .ok_or_else(out_of_range)?;
            now.checked_sub_months(Months::new(months))
        }
        _ => {
            return Err(DateError::UnsupportedUnit {
                unit: unit.clone(),
                raw: raw.to_string(),
            });
        }
    }
    .ok_or_else(out_of_range)?;

    Ok(past.format(DATE_FORMAT).to_string())
}

/// The date written to the spreadsheet: relative times are resolved, absolute
/// dates pass through untouched.
pub fn resolve_date(raw: &str, now: NaiveDateTime) -> Result<String, DateError> {
    if is_relative(raw) {
        calculate_past_date(raw, now)
    } else {
        Ok(raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan_10_2025() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_days_ago() {
        assert_eq!(calculate_past_date("3 days ago", jan_10_2025()).unwrap(), "Jan 07, 2025");
    }

    #[test]
    fn test_units_are_case_insensitive_and_plural_optional() {
        let now = jan_10_2025();
        assert_eq!(calculate_past_date("1 Day ago", now).unwrap(), "Jan 09, 2025");
        assert_eq!(calculate_past_date("2 WEEKS ago", now).unwrap(), "Dec 27, 2024");
        assert_eq!(calculate_past_date("13 hours ago", now).unwrap(), "Jan 09, 2025");
        assert_eq!(calculate_past_date("45 minutes ago", now).unwrap(), "Jan 10, 2025");
        assert_eq!(calculate_past_date("30 seconds ago", now).unwrap(), "Jan 10, 2025");
        assert_eq!(calculate_past_date("an hour ago", now).unwrap(), "Jan 10, 2025");
    }

    #[test]
    fn test_months_and_years_use_calendar() {
        let now = jan_10_2025();
        assert_eq!(calculate_past_date("2 months ago", now).unwrap(), "Nov 10, 2024");
        assert_eq!(calculate_past_date("1 year ago", now).unwrap(), "Jan 10, 2024");
    }

    #[test]
    fn test_unrecognized_relative() {
        let err = calculate_past_date("sometime ago", jan_10_2025()).unwrap_err();
        assert!(matches!(err, DateError::UnrecognizedRelative(_)));
    }

    #[test]
    fn test_unsupported_unit() {
        let err = calculate_past_date("3 fortnights ago", jan_10_2025()).unwrap_err();
        assert_eq!(
            err,
            DateError::UnsupportedUnit {
                unit: "fortnights".to_string(),
                raw: "3 fortnights ago".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_passes_absolute_through() {
        assert_eq!(resolve_date("Jul 15, 2023", jan_10_2025()).unwrap(), "Jul 15, 2023");
        assert_eq!(resolve_date("3 days ago", jan_10_2025()).unwrap(), "Jan 07, 2025");
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("Dec 01, 2022").unwrap(), (2022, 12));
        assert_eq!(parse_year_month("September 3, 2024").unwrap(), (2024, 9));
        assert!(parse_year_month("yesterday").is_err());
        assert!(parse_year_month("Foo 01, 2022").is_err());
        assert!(parse_year_month("Jan 01, 22").is_err());
    }

    #[test]
    fn test_window_excludes_older_months() {
        let threshold = RecencyThreshold { month: 6, year: 2023 };
        assert!(!is_within_window("Dec 01, 2022", &threshold).unwrap());
        assert!(is_within_window("Jul 15, 2023", &threshold).unwrap());
    }

    #[test]
    fn test_window_includes_early_months_of_later_years() {
        let threshold = RecencyThreshold { month: 6, year: 2023 };
        assert!(is_within_window("Jan 05, 2024", &threshold).unwrap());
    }

    #[test]
    fn test_relative_times_are_always_in_window() {
        let threshold = RecencyThreshold { month: 12, year: 2999 };
        assert!(is_within_window("5 years ago", &threshold).unwrap());
    }
}
