mod summary;

pub use summary::{SummaryCreatedData, SummaryData};
