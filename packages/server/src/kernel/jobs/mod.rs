//! Background job infrastructure.
//!
//! Requests enqueue units of work (a job type plus a JSON payload) onto a
//! database-backed queue; the `JobRunner` executes them on a separate task
//! with its own failure isolation, decoupled from the request/response
//! cycle.

pub mod job;
pub mod queue;
pub mod registry;
pub mod runner;

pub use job::{ErrorKind, Job, JobCommand, JobStatus};
pub use queue::{JobQueue, PgJobQueue};
pub use registry::{JobRegistry, SharedJobRegistry};
pub use runner::{classify_error, JobRunner, JobRunnerConfig};
