//! Canned dependency implementations for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::scraper::{PageScraper, ScrapedPage};

/// Scraper that returns the same text for every URL.
pub struct StaticPageScraper {
    title: Option<String>,
    text: String,
}

impl StaticPageScraper {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: None,
            text: text.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[async_trait]
impl PageScraper for StaticPageScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        Ok(ScrapedPage {
            url: url.to_string(),
            title: self.title.clone(),
            text: self.text.clone(),
        })
    }
}

/// Scraper that fails every request, for exercising retry paths.
pub struct FailingPageScraper;

#[async_trait]
impl PageScraper for FailingPageScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        bail!("connection refused for {}", url);
    }
}
