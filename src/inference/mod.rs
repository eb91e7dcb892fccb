//! ONNX inference for bird species detection in photos.

mod detector;
mod labels;
mod postprocess;
mod session;

pub use detector::{Detector, DetectorParams};
pub use labels::read_labels_file;
pub use postprocess::{Candidate, Letterbox, decode_output, non_max_suppression};
pub use session::{build_session, validate_model_path};
