//! Response shapes for the summaries resource.
//!
//! Hand-written DTOs, deliberately decoupled from the storage row so the
//! wire format can evolve independently of the schema.

use serde::{Deserialize, Serialize};

use crate::domains::summaries::models::Summary;

/// Full record, returned by read and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    pub id: i64,
    pub url: String,
    pub summary: String,
    pub created_at: String,
}

impl From<Summary> for SummaryData {
    fn from(record: Summary) -> Self {
        Self {
            id: record.id,
            url: record.url,
            summary: record.summary,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Minimal shape returned by create and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCreatedData {
    pub id: i64,
    pub url: String,
}

impl From<Summary> for SummaryCreatedData {
    fn from(record: Summary) -> Self {
        Self {
            id: record.id,
            url: record.url,
        }
    }
}
