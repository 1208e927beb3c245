//! [`FeedSession`] backed by a real browser through a WebDriver server
//! (chromedriver by default).

use super::FeedSession;
use crate::config::FeedSelectors;
use crate::error::SessionError;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument, warn};

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct WebDriverSession {
    driver: WebDriver,
    selectors: FeedSelectors,
    page_load_timeout: Duration,
}

impl WebDriverSession {
    /// Start a Chrome session on the WebDriver server at `server_url`.
    #[instrument(level = "info", skip(selectors))]
    pub async fn start(
        server_url: &str,
        headless: bool,
        selectors: FeedSelectors,
        page_load_timeout: Duration,
    ) -> Result<Self, SessionError> {
        url::Url::parse(server_url)
            .map_err(|e| SessionError::Other(format!("invalid WebDriver URL {server_url:?}: {e}")))?;

        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless()?;
        }
        let driver = WebDriver::new(server_url, caps).await?;
        info!("Browser session started");

        Ok(Self {
            driver,
            selectors,
            page_load_timeout,
        })
    }

    /// End the browser session.
    pub async fn quit(self) -> Result<(), SessionError> {
        self.driver.quit().await?;
        info!("Browser session closed");
        Ok(())
    }
}

impl FeedSession for WebDriverSession {
    #[instrument(level = "info", skip(self))]
    async fn open(&mut self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await?;

        let list_rendered = self
            .driver
            .query(By::ClassName(self.selectors.list_class.as_str()))
            .wait(self.page_load_timeout, POLL_INTERVAL)
            .exists()
            .await?;
        if !list_rendered {
            warn!(
                timeout = ?self.page_load_timeout,
                "Result list did not render; the search may have no results"
            );
        }
        Ok(())
    }

    async fn result_summary(&mut self) -> Result<Option<String>, SessionError> {
        let found = self
            .driver
            .find_all(By::ClassName(self.selectors.summary_class.as_str()))
            .await?;
        match found.first() {
            Some(el) => Ok(Some(el.text().await?)),
            None => Ok(None),
        }
    }

    async fn article_fragments(&mut self) -> Result<Vec<String>, SessionError> {
        let articles = self
            .driver
            .find_all(By::Tag(self.selectors.article_tag.as_str()))
            .await?;

        let mut fragments = Vec::with_capacity(articles.len());
        for article in &articles {
            fragments.push(article.outer_html().await?);
        }
        debug!(count = fragments.len(), "Read rendered articles");
        Ok(fragments)
    }

    async fn show_more(&mut self) -> Result<bool, SessionError> {
        self.driver.execute(SCROLL_TO_BOTTOM, Vec::new()).await?;

        let buttons = self
            .driver
            .find_all(By::XPath(self.selectors.show_more_xpath.as_str()))
            .await?;
        let Some(button) = buttons.first() else {
            debug!("No show-more control on the page");
            return Ok(false);
        };

        button.scroll_into_view().await?;
        button.click().await?;
        debug!("Clicked show-more");
        Ok(true)
    }
}
