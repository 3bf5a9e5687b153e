//! The summaries domain: one record per submitted URL, enriched in the
//! background with extracted text.

pub mod actions;
pub mod data;
pub mod jobs;
pub mod models;
