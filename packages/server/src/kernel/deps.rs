//! Shared server dependencies.
//!
//! Constructed once at startup and passed explicitly to the components
//! that need them (handlers via `AppState`, job handlers via the runner).

use std::sync::Arc;

use sqlx::PgPool;

use super::jobs::JobQueue;
use super::scraper::PageScraper;

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub scraper: Arc<dyn PageScraper>,
    pub job_queue: Arc<dyn JobQueue>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        scraper: Arc<dyn PageScraper>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            db_pool,
            scraper,
            job_queue,
        }
    }
}
