//! Prediction output: annotated images, JSON reports, progress display.

pub mod annotate;
mod json;
pub mod progress;
mod types;

pub use json::write_report;
pub use types::{BoundingBox, Detection, PredictionReport, ReportSettings, ReportSummary};
