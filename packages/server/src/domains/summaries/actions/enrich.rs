//! Enrichment: fetch the page behind a summary record and fill in its
//! summary text.

use anyhow::{Context, Result};
use tracing::info;

use crate::domains::summaries::models::Summary;
use crate::kernel::{summarize, ServerDeps};

/// Number of sentences kept in a generated summary.
const SUMMARY_SENTENCES: usize = 5;

/// Scrape `url` and write the derived summary back onto the record.
///
/// Runs after the create response has already been sent. A concurrent
/// update or delete on the same record is unsynchronized with this write;
/// last writer wins on the summary field.
pub async fn enrich_summary(summary_id: i64, url: &str, deps: &ServerDeps) -> Result<()> {
    let page = deps
        .scraper
        .scrape(url)
        .await
        .with_context(|| format!("failed to scrape {}", url))?;

    let mut text = summarize(&page.text, SUMMARY_SENTENCES);
    if text.is_empty() {
        // Pages with no extractable body still get something useful
        text = page.title.unwrap_or_default();
    }

    let updated = Summary::set_summary(summary_id, &text, &deps.db_pool).await?;
    if !updated {
        info!(
            summary_id = summary_id,
            "record deleted before enrichment completed"
        );
        return Ok(());
    }

    info!(
        summary_id = summary_id,
        summary_chars = text.len(),
        "summary enriched"
    );
    Ok(())
}
