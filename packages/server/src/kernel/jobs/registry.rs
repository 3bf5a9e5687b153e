//! Job registry for deserializing and executing jobs.
//!
//! Maps job type strings (e.g. "generate_summary") to handlers that
//! reconstruct typed command structs from JSON and run the job logic.
//! The runner claims jobs from the database and dispatches through this
//! registry without knowing the concrete types.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

use super::job::{Job, JobCommand};
use crate::kernel::ServerDeps;

/// Async handler taking the raw job payload and shared dependencies.
type BoxedHandler = Box<
    dyn Fn(serde_json::Value, Arc<ServerDeps>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>
        + Send
        + Sync,
>;

/// Registry that maps job type strings to handlers.
///
/// Each domain registers its job types at startup.
#[derive(Default)]
pub struct JobRegistry {
    handlers: HashMap<&'static str, BoxedHandler>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a job type with its handler.
    ///
    /// The handler is an async function receiving the deserialized command
    /// and the shared dependencies.
    pub fn register<J, F, Fut>(&mut self, job_type: &'static str, handler: F)
    where
        J: JobCommand + DeserializeOwned + Send + Sync + 'static,
        F: Fn(J, Arc<ServerDeps>) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let boxed: BoxedHandler = Box::new(move |value, deps| {
            let handler = handler.clone();
            Box::pin(async move {
                let command: J = serde_json::from_value(value)
                    .map_err(|e| anyhow!("failed to deserialize {}: {}", job_type, e))?;
                handler(command, deps).await
            })
        });

        self.handlers.insert(job_type, boxed);
    }

    /// Execute a claimed job using its registered handler.
    pub async fn execute(&self, job: &Job, deps: Arc<ServerDeps>) -> Result<()> {
        let handler = self
            .handlers
            .get(job.job_type.as_str())
            .ok_or_else(|| anyhow!("unknown job type: {}", job.job_type))?;

        handler(job.args.clone(), deps).await
    }

    pub fn is_registered(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    pub fn registered_types(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

/// Thread-safe registry wrapped in Arc.
pub type SharedJobRegistry = Arc<JobRegistry>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestJob {
        pub name: String,
    }

    impl JobCommand for TestJob {
        const JOB_TYPE: &'static str = "test_job";
    }

    #[test]
    fn test_register_and_check() {
        let mut registry = JobRegistry::new();
        registry.register::<TestJob, _, _>(TestJob::JOB_TYPE, |_job, _deps| async move { Ok(()) });

        assert!(registry.is_registered("test_job"));
        assert!(!registry.is_registered("unknown_job"));
    }

    #[test]
    fn test_registered_types() {
        let mut registry = JobRegistry::new();
        registry.register::<TestJob, _, _>(TestJob::JOB_TYPE, |_job, _deps| async move { Ok(()) });

        assert!(registry.registered_types().contains(&"test_job"));
    }
}
