//! Prediction pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    PredictOptions, ProcessCheck, annotated_path_for, collect_input_files, output_dir_for,
    report_path_for, should_process,
};
pub use processor::{ProcessResult, process_file};
