//! Raw model output decoding and overlap suppression.
//!
//! Detection models emit one tensor shaped `[1, 4 + classes, anchors]`:
//! four rows of center/size box coordinates followed by one row of scores
//! per class, all in letterbox coordinates. Decoding picks the best class
//! per anchor, drops low scores, and greedy per-class suppression removes
//! overlapping boxes.

use crate::output::BoundingBox;

/// Candidate detection in letterbox coordinates.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Corner-form box in letterbox space.
    pub bbox: BoundingBox,
    /// Best-scoring class index.
    pub class: usize,
    /// Score of the best class.
    pub score: f32,
}

/// Geometry of the letterbox transform applied before inference.
#[derive(Debug, Clone, Copy)]
pub struct Letterbox {
    /// Uniform scale applied to the source image.
    pub scale: f32,
    /// Horizontal padding on each side, in target pixels.
    pub pad_x: f32,
    /// Vertical padding on each side, in target pixels.
    pub pad_y: f32,
    /// Source image width.
    pub source_width: u32,
    /// Source image height.
    pub source_height: u32,
}

impl Letterbox {
    /// Fit a source image into a square target, preserving aspect ratio.
    pub fn fit(source_width: u32, source_height: u32, target: u32) -> Self {
        let target = target as f32;
        let scale =
            (target / source_width as f32).min(target / source_height as f32);
        let scaled_w = (source_width as f32 * scale).round();
        let scaled_h = (source_height as f32 * scale).round();

        Self {
            scale,
            pad_x: (target - scaled_w) / 2.0,
            pad_y: (target - scaled_h) / 2.0,
            source_width,
            source_height,
        }
    }

    /// Width of the scaled image inside the letterbox.
    pub fn scaled_width(&self) -> u32 {
        (self.source_width as f32 * self.scale).round() as u32
    }

    /// Height of the scaled image inside the letterbox.
    pub fn scaled_height(&self) -> u32 {
        (self.source_height as f32 * self.scale).round() as u32
    }

    /// Map a box from letterbox coordinates back to source pixels,
    /// clamped to the image bounds.
    pub fn unmap(&self, bbox: &BoundingBox) -> BoundingBox {
        let width = self.source_width as f32;
        let height = self.source_height as f32;

        BoundingBox {
            x1: ((bbox.x1 - self.pad_x) / self.scale).clamp(0.0, width),
            y1: ((bbox.y1 - self.pad_y) / self.scale).clamp(0.0, height),
            x2: ((bbox.x2 - self.pad_x) / self.scale).clamp(0.0, width),
            y2: ((bbox.y2 - self.pad_y) / self.scale).clamp(0.0, height),
        }
    }
}

/// Decode a raw output tensor into candidates above the score threshold.
///
/// `data` holds the `[1, 4 + classes, anchors]` tensor flattened row-major.
pub fn decode_output(
    data: &[f32],
    classes: usize,
    anchors: usize,
    conf_threshold: f32,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for anchor in 0..anchors {
        let mut best_class = 0usize;
        let mut best_score = 0.0f32;
        for class in 0..classes {
            let score = data[(4 + class) * anchors + anchor];
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        if best_score < conf_threshold {
            continue;
        }

        let cx = data[anchor];
        let cy = data[anchors + anchor];
        let w = data[2 * anchors + anchor];
        let h = data[3 * anchors + anchor];

        candidates.push(Candidate {
            bbox: BoundingBox {
                x1: cx - w / 2.0,
                y1: cy - h / 2.0,
                x2: cx + w / 2.0,
                y2: cy + h / 2.0,
            },
            class: best_class,
            score: best_score,
        });
    }

    candidates
}

/// Greedy per-class non-maximum suppression.
///
/// Candidates are taken in descending score order; a candidate is dropped
/// when a kept box of the same class overlaps it above `iou_threshold`.
/// At most `max_detections` candidates survive.
pub fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    'candidates: for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        for existing in &kept {
            if existing.class == candidate.class
                && existing.bbox.iou(&candidate.bbox) > iou_threshold
            {
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }

    kept
}
