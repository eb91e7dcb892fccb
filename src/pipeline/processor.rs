//! Single image prediction.

use crate::error::{Error, Result};
use crate::inference::Detector;
use crate::output::{self, PredictionReport, ReportSettings, annotate};
use crate::pipeline::{PredictOptions, annotated_path_for, report_path_for};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Result of predicting a single image.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of detections found.
    pub detections: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
}

/// Run detection on one image and write its result artifacts.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    detector: &mut Detector,
    options: &PredictOptions,
) -> Result<ProcessResult> {
    let start = Instant::now();

    info!("Processing: {}", input.display());

    let image = image::open(input).map_err(|e| Error::ImageDecode {
        path: input.to_path_buf(),
        source: e,
    })?;

    let detections = detector.detect(&image)?;
    let count = detections.len();
    let params = detector.params();
    info!(
        "Found {count} detections above {:.1}% confidence",
        params.confidence * 100.0
    );

    if options.debug {
        let json =
            serde_json::to_string_pretty(&detections).map_err(|e| Error::Internal {
                message: format!("failed to serialize detections: {e}"),
            })?;
        println!("{json}");
    }

    std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDirCreateFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let annotated = annotate::annotate(&image, &detections);
    let annotated_path = annotated_path_for(input, output_dir);
    annotate::save_annotated(&annotated, &annotated_path)?;
    debug!("Annotated image written to {}", annotated_path.display());

    if options.save_json {
        let source_file = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        let report = PredictionReport::new(
            source_file,
            detector.model_name(),
            ReportSettings {
                confidence: params.confidence,
                iou: params.iou,
            },
            detections,
        );
        let report_path = report_path_for(input, output_dir);
        output::write_report(&report_path, &report)?;
        debug!("Report written to {}", report_path.display());
    }

    Ok(ProcessResult {
        detections: count,
        duration_secs: start.elapsed().as_secs_f64(),
    })
}
