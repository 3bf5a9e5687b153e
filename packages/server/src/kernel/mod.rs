//! Infrastructure shared across domains: dependency container, background
//! job machinery, page scraping, and summarization.

pub mod deps;
pub mod jobs;
pub mod scraper;
pub mod summarizer;
pub mod testing;

pub use deps::ServerDeps;
pub use scraper::{HttpPageScraper, PageScraper, ScrapedPage};
pub use summarizer::summarize;
