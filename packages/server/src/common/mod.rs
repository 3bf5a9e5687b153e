pub mod errors;
pub mod extract;

pub use errors::{ApiError, FieldError};
pub use extract::{ApiJson, ApiPath};
