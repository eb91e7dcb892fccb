//! Output type definitions.

use crate::constants::confidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Axis-aligned bounding box in source image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Box width; zero when degenerate.
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Box height; zero when degenerate.
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Box area; zero when degenerate.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &Self) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// A single bird detection in a photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Species name of the detected bird.
    pub name: String,
    /// Model class index.
    pub class: usize,
    /// Detection confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Bounding box in source image coordinates.
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl Detection {
    /// Create a detection, rounding confidence for output.
    pub fn new(name: impl Into<String>, class: usize, conf: f32, bbox: BoundingBox) -> Self {
        let factor = 10f32.powi(confidence::DECIMAL_PLACES);
        Self {
            name: name.into(),
            class,
            confidence: (conf * factor).round() / factor,
            bbox,
        }
    }
}

/// Settings block recorded in prediction result files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Minimum confidence threshold used.
    pub confidence: f32,
    /// IoU threshold used for overlap suppression.
    pub iou: f32,
}

/// Summary statistics for one image.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of detections.
    pub total_detections: usize,
    /// Number of distinct species detected.
    pub unique_species: usize,
}

/// JSON result file structure for one image.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Source image file name.
    pub source_file: String,
    /// Prediction timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Model used for prediction.
    pub model: String,
    /// Prediction settings.
    pub settings: ReportSettings,
    /// Detection results.
    pub detections: Vec<Detection>,
    /// Summary statistics.
    pub summary: ReportSummary,
}

impl PredictionReport {
    /// Build a report for one image, computing the summary.
    pub fn new(
        source_file: impl Into<String>,
        model: impl Into<String>,
        settings: ReportSettings,
        detections: Vec<Detection>,
    ) -> Self {
        let unique_species: HashSet<&str> =
            detections.iter().map(|d| d.name.as_str()).collect();

        let summary = ReportSummary {
            total_detections: detections.len(),
            unique_species: unique_species.len(),
        };

        Self {
            source_file: source_file.into(),
            analysis_date: Utc::now(),
            model: model.into(),
            settings,
            detections,
            summary,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample_box() -> BoundingBox {
        BoundingBox {
            x1: 10.0,
            y1: 20.0,
            x2: 110.0,
            y2: 70.0,
        }
    }

    #[test]
    fn test_bounding_box_dimensions() {
        let b = sample_box();
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert_eq!(b.area(), 5000.0);
    }

    #[test]
    fn test_iou_identical_boxes() {
        let b = sample_box();
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_boxes() {
        let a = sample_box();
        let b = BoundingBox {
            x1: 500.0,
            y1: 500.0,
            x2: 600.0,
            y2: 600.0,
        };
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = BoundingBox {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
        };
        let b = BoundingBox {
            x1: 0.0,
            y1: 5.0,
            x2: 10.0,
            y2: 15.0,
        };
        // intersection 50, union 150
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_detection_rounds_confidence() {
        let d = Detection::new("Mallard", 0, 0.123_456_78, sample_box());
        assert_eq!(d.confidence, 0.12346);
    }

    #[test]
    fn test_report_summary_counts_unique_species() {
        let settings = ReportSettings {
            confidence: 0.25,
            iou: 0.45,
        };
        let detections = vec![
            Detection::new("Mallard", 0, 0.9, sample_box()),
            Detection::new("Osprey", 17, 0.8, sample_box()),
            Detection::new("Mallard", 0, 0.7, sample_box()),
        ];
        let report = PredictionReport::new("ducks.jpg", "best.onnx", settings, detections);

        assert_eq!(report.summary.total_detections, 3);
        assert_eq!(report.summary.unique_species, 2);
        assert_eq!(report.source_file, "ducks.jpg");
    }

    #[test]
    fn test_detection_serializes_box_field() {
        let d = Detection::new("Mallard", 0, 0.9, sample_box());
        let json = serde_json::to_string(&d).unwrap_or_default();
        assert!(json.contains("\"box\""));
        assert!(json.contains("\"x1\""));
        assert!(json.contains("\"name\":\"Mallard\""));
    }
}
