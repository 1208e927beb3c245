//! Thumbnail downloads.
//!
//! Files are named `<id><ext>`, where the extension comes from the response's
//! `Content-Type` and is left off when the type is missing or unknown.

use crate::error::ImageError;
use crate::retry::RetryPolicy;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, ImageError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, retry })
    }

    /// Fetch `url` and save it in `dir` as `<stem><ext>`.
    #[instrument(level = "debug", skip(self, dir))]
    pub async fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf, ImageError> {
        let (bytes, content_type) = self
            .retry
            .run("image download", || fetch(&self.client, url))
            .await?;

        let path = dir.join(format!("{stem}{}", extension_for(content_type.as_deref())));
        fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(path)
    }
}

async fn fetch(client: &Client, url: &str) -> Result<(Vec<u8>, Option<String>), ImageError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status(status));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?.to_vec();
    Ok((bytes, content_type))
}

/// File extension (with the dot) for a `Content-Type` header value.
pub fn extension_for(content_type: Option<&str>) -> String {
    let Some(essence) = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
    else {
        return String::new();
    };

    match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => ".jpg".to_string(),
        "image/svg+xml" => ".svg".to_string(),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default(),
    }
}
