mod health;
mod summaries;

pub use health::health_handler;
pub use summaries::{
    create_summary, delete_summary, read_all_summaries, read_summary, update_summary,
};
