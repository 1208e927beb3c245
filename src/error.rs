//! Error types for each stage of a sweep.
//!
//! Each stage gets its own enum so callers can decide locally whether a
//! failure is fatal for the run, for a single record, or only for an image.

use thiserror::Error;

/// Failures while interpreting a published-time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognized relative time: {0:?}")]
    UnrecognizedRelative(String),

    #[error("unsupported time unit {unit:?} in {raw:?}")]
    UnsupportedUnit { unit: String, raw: String },

    #[error("relative time {0:?} is out of range")]
    OutOfRange(String),

    #[error("invalid absolute date: {0:?}")]
    InvalidAbsolute(String),
}

/// An article node did not have the shape the feed normally renders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("article has no <{0}> element")]
    MissingElement(&'static str),

    #[error("article summary has no \" ... \" delimiter: {0:?}")]
    MissingDelimiter(String),
}

/// Failures talking to the browser session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("session error: {0}")]
    Other(String),
}

/// Failures fetching or saving a thumbnail.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that stop the export as a whole.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}
