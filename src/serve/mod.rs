//! Serverless prediction endpoint.

mod handler;
mod types;

pub use handler::{ServeState, handle_job};
pub use types::{Job, JobInput, JobOutcome};
