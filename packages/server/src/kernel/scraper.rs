//! Page fetching and readable-text extraction.
//!
//! Uses reqwest for HTTP and the scraper crate for HTML parsing. The
//! extractor looks for a main content element first and falls back to the
//! page body with boilerplate (nav, scripts, footers) stripped out.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// The readable content pulled out of one page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Fetches a URL and extracts its main textual content.
///
/// Behind a trait so tests can substitute a canned implementation and the
/// enrichment job never hits the network in the test suite.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}

/// HTTP scraper using reqwest + scraper.
pub struct HttpPageScraper {
    client: reqwest::Client,
}

impl HttpPageScraper {
    pub fn new() -> Result<Self> {
        // Browser-like User-Agent to avoid trivial bot blocks
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        debug!(url = %url, "scraping page");

        let html = self.fetch_html(url).await?;
        let (title, text) = extract_content(&html);

        if text.trim().len() < 100 {
            warn!(url = %url, "page has minimal content");
        }

        Ok(ScrapedPage {
            url: url.to_string(),
            title,
            text,
        })
    }
}

/// Parse an HTML document and pull out (title, readable text).
pub fn extract_content(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let text = extract_text(&document);
    (title, text)
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Extract readable text, preferring a main content element.
fn extract_text(document: &Html) -> String {
    let main_selectors = [
        "main",
        "article",
        "[role='main']",
        "#content",
        "#main",
        ".content",
        ".post-content",
        ".entry-content",
    ];

    for selector_str in main_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(main) = document.select(&selector).next() {
                return collect_text(&main.html());
            }
        }
    }

    // Fallback: body with boilerplate stripped
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return collect_text(&remove_boilerplate(&body.html()));
        }
    }

    collect_text(&document.html())
}

/// Remove nav/header/footer/script elements from an HTML fragment.
fn remove_boilerplate(html: &str) -> String {
    let document = Html::parse_document(html);
    let unwanted = [
        "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe",
        ".nav", ".navbar", ".sidebar", ".menu", ".advertisement",
        "#nav", "#header", "#footer", "#sidebar",
    ];

    let mut result = html.to_string();
    for selector_str in unwanted {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                result = result.replace(&element.html(), "");
            }
        }
    }

    result
}

/// Collapse an HTML fragment into whitespace-normalized plain text.
fn collect_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: Vec<String> = fragment
        .root_element()
        .text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    text.join(" ")
}
