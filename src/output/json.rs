//! JSON result file writer.

use crate::error::{Error, Result};
use crate::output::PredictionReport;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a prediction report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &PredictionReport) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(|e| Error::JsonWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::{BoundingBox, Detection, ReportSettings};
    use tempfile::tempdir;

    #[test]
    fn test_write_report_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mallard_result.json");

        let report = PredictionReport::new(
            "mallard.jpg",
            "best.onnx",
            ReportSettings {
                confidence: 0.25,
                iou: 0.45,
            },
            vec![Detection::new(
                "Mallard",
                0,
                0.93,
                BoundingBox {
                    x1: 12.0,
                    y1: 34.0,
                    x2: 256.0,
                    y2: 312.0,
                },
            )],
        );

        write_report(&path, &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: PredictionReport = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.source_file, "mallard.jpg");
        assert_eq!(parsed.detections.len(), 1);
        assert_eq!(parsed.detections[0].name, "Mallard");
        assert_eq!(parsed.summary.total_detections, 1);
    }
}
