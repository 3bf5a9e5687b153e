//! Background job definitions for the summaries domain.

use serde::{Deserialize, Serialize};

use super::actions::enrich_summary;
use crate::kernel::jobs::{JobCommand, JobRegistry};

/// Deferred enrichment of a freshly created summary record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSummaryJob {
    pub summary_id: i64,
    pub url: String,
}

impl JobCommand for GenerateSummaryJob {
    const JOB_TYPE: &'static str = "generate_summary";
}

/// Register all summaries job handlers with the registry.
pub fn register_summary_jobs(registry: &mut JobRegistry) {
    registry.register::<GenerateSummaryJob, _, _>(GenerateSummaryJob::JOB_TYPE, |job, deps| {
        async move { enrich_summary(job.summary_id, &job.url, &deps).await }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_summary_registered() {
        let mut registry = JobRegistry::new();
        register_summary_jobs(&mut registry);
        assert!(registry.is_registered("generate_summary"));
    }

    #[test]
    fn test_job_round_trips_through_json() {
        let job = GenerateSummaryJob {
            summary_id: 7,
            url: "http://foo.bar/".to_string(),
        };
        let value = serde_json::to_value(&job).unwrap();
        let back: GenerateSummaryJob = serde_json::from_value(value).unwrap();
        assert_eq!(back.summary_id, 7);
        assert_eq!(back.url, "http://foo.bar/");
    }
}
