//! Field extraction from a single rendered article node.
//!
//! The session hands over each article's outer HTML. A feed article looks like
//!
//! ```html
//! <article>
//!   <h3><a href="...">Title</a></h3>
//!   <p><span>3 days ago</span> ... Summary text</p>
//!   <img src="/wp-content/uploads/thumb.jpg">
//! </article>
//! ```

use crate::config::FeedSelectors;
use crate::error::ExtractError;
use crate::utils::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const SUMMARY_DELIMITER: &str = " ... ";

/// Raw fields of one article before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    pub published_time: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Parsed selectors, built once per run.
#[derive(Debug)]
pub struct ArticleExtractor {
    title: Selector,
    summary: Selector,
    image: Selector,
    base_url: Option<Url>,
}

impl ArticleExtractor {
    pub fn new(selectors: &FeedSelectors, base_url: &str) -> Result<Self, String> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| format!("bad selector {s:?}: {e}"));
        Ok(Self {
            title: parse(&selectors.title_tag)?,
            summary: parse(&selectors.summary_tag)?,
            image: parse(&selectors.image_tag)?,
            base_url: Url::parse(base_url).ok(),
        })
    }

    pub fn extract(&self, article_html: &str) -> Result<ArticleFields, ExtractError> {
        let fragment = Html::parse_fragment(article_html);

        let title = fragment
            .select(&self.title)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingElement("h3"))?;

        let summary = fragment
            .select(&self.summary)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingElement("p"))?;

        let mut parts = summary.split(SUMMARY_DELIMITER);
        let (published_time, description) = match (parts.next(), parts.next()) {
            (Some(time), Some(description)) => (time.trim().to_string(), description.trim().to_string()),
            _ => return Err(ExtractError::MissingDelimiter(summary.clone())),
        };

        let image_url = fragment
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| self.resolve(src))
            .unwrap_or_default();

        Ok(ArticleFields {
            published_time,
            title,
            description,
            image_url,
        })
    }

    fn resolve(&self, src: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string()),
            None => src.to_string(),
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}
