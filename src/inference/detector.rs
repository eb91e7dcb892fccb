//! YOLO-style bird detector over an ONNX session.

use crate::config::{InferenceDevice, ModelConfig};
use crate::constants::model;
use crate::error::{Error, Result};
use crate::inference::postprocess::{Letterbox, decode_output, non_max_suppression};
use crate::inference::{labels, session};
use crate::output::Detection;
use image::{DynamicImage, Rgb, RgbImage, imageops};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::{debug, info};

/// Detection thresholds and input geometry.
#[derive(Debug, Clone, Copy)]
pub struct DetectorParams {
    /// Square model input size.
    pub input_size: u32,
    /// Minimum confidence to keep a detection.
    pub confidence: f32,
    /// IoU threshold for overlap suppression.
    pub iou: f32,
    /// Maximum detections kept per image.
    pub max_detections: usize,
}

impl From<&ModelConfig> for DetectorParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            input_size: config.input_size,
            confidence: config.confidence,
            iou: config.iou,
            max_detections: config.max_detections,
        }
    }
}

/// Bird detector backed by an ONNX session.
pub struct Detector {
    session: Session,
    labels: Vec<String>,
    params: DetectorParams,
    model_name: String,
}

impl Detector {
    /// Load a detector.
    ///
    /// Labels come from `labels_file` when given, otherwise from the class
    /// names embedded in the model's metadata.
    pub fn new(
        model_path: &Path,
        labels_file: Option<&Path>,
        device: InferenceDevice,
        params: DetectorParams,
    ) -> Result<Self> {
        let session = session::build_session(model_path, device)?;

        let labels = match labels_file {
            Some(path) => labels::read_labels_file(path)?,
            None => labels::labels_from_metadata(&session)?.ok_or_else(|| {
                Error::DetectorBuild {
                    reason: "model metadata has no class names, provide a labels file"
                        .to_string(),
                }
            })?,
        };

        let model_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_path.display().to_string());

        info!(
            "Loaded model: {model_name}, {} classes, input {}x{}",
            labels.len(),
            params.input_size,
            params.input_size
        );

        Ok(Self {
            session,
            labels,
            params,
            model_name,
        })
    }

    /// Build a detector straight from model configuration.
    pub fn from_config(config: &ModelConfig, device: InferenceDevice) -> Result<Self> {
        Self::new(
            &config.resolved_path(),
            config.labels.as_deref(),
            device,
            DetectorParams::from(config),
        )
    }

    /// Class labels in model order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Active thresholds and input geometry.
    pub fn params(&self) -> DetectorParams {
        self.params
    }

    /// File name of the loaded model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Run detection on one image, returning boxes in source coordinates.
    pub fn detect(&mut self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (tensor, letterbox) = preprocess(image, self.params.input_size)?;

        let outputs = self
            .session
            .run(ort::inputs![model::INPUT_NAME => tensor])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let output = outputs
            .get(model::OUTPUT_NAME)
            .ok_or_else(|| Error::Inference {
                reason: format!("model has no '{}' output", model::OUTPUT_NAME),
            })?;
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        if shape.len() != 3 || shape[0] != 1 || shape[1] <= 4 {
            return Err(Error::Inference {
                reason: format!("unexpected model output shape {shape:?}"),
            });
        }

        let classes = shape[1] as usize - 4;
        let anchors = shape[2] as usize;

        if classes != self.labels.len() {
            return Err(Error::Inference {
                reason: format!(
                    "model predicts {classes} classes but {} labels are loaded",
                    self.labels.len()
                ),
            });
        }

        let candidates = decode_output(data, classes, anchors, self.params.confidence);
        let kept = non_max_suppression(candidates, self.params.iou, self.params.max_detections);

        debug!(
            "{} candidate(s), {} kept after suppression",
            anchors,
            kept.len()
        );

        let detections = kept
            .into_iter()
            .map(|c| {
                let bbox = letterbox.unmap(&c.bbox);
                let name = self
                    .labels
                    .get(c.class)
                    .cloned()
                    .unwrap_or_else(|| format!("class {}", c.class));
                Detection::new(name, c.class, c.score, bbox)
            })
            .collect();

        Ok(detections)
    }
}

/// Letterbox an image into a normalized CHW input tensor.
fn preprocess(image: &DynamicImage, input_size: u32) -> Result<(Tensor<f32>, Letterbox)> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let letterbox = Letterbox::fit(width, height, input_size);

    let resized = imageops::resize(
        &rgb,
        letterbox.scaled_width().max(1),
        letterbox.scaled_height().max(1),
        imageops::FilterType::Triangle,
    );

    let mut canvas = RgbImage::from_pixel(
        input_size,
        input_size,
        Rgb([model::LETTERBOX_FILL; 3]),
    );
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(letterbox.pad_x as u32),
        i64::from(letterbox.pad_y as u32),
    );

    let size = input_size as usize;
    let plane = size * size;
    let mut data = vec![0f32; 3 * plane];
    for (x, y, pixel) in canvas.enumerate_pixels() {
        let idx = y as usize * size + x as usize;
        data[idx] = f32::from(pixel[0]) / 255.0;
        data[plane + idx] = f32::from(pixel[1]) / 255.0;
        data[2 * plane + idx] = f32::from(pixel[2]) / 255.0;
    }

    let tensor =
        Tensor::from_array(([1usize, 3, size, size], data)).map_err(|e| Error::Inference {
            reason: e.to_string(),
        })?;

    Ok((tensor, letterbox))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_shapes_and_padding() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 50, Rgb([255, 0, 0])));
        let (_tensor, letterbox) = preprocess(&img, 640).unwrap();

        assert_eq!(letterbox.scaled_width(), 640);
        assert_eq!(letterbox.scaled_height(), 320);
        assert!((letterbox.pad_y - 160.0).abs() < f32::EPSILON);
        assert!((letterbox.pad_x - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_params_from_model_config() {
        let config = ModelConfig::default();
        let params = DetectorParams::from(&config);
        assert_eq!(params.input_size, 640);
        assert!((params.confidence - 0.25).abs() < f32::EPSILON);
        assert!((params.iou - 0.45).abs() < f32::EPSILON);
        assert_eq!(params.max_detections, 300);
    }
}
