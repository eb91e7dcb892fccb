//! Configuration type definitions.

use crate::constants::{checklist, flickr, model, scrape, trainer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo API settings.
    #[serde(default)]
    pub flickr: FlickrConfig,

    /// Dataset scraping settings.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Species checklist settings.
    #[serde(default)]
    pub checklist: ChecklistConfig,

    /// External trainer settings.
    #[serde(default)]
    pub trainer: TrainerConfig,

    /// Detection model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Photo API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickrConfig {
    /// API key; falls back to the `FLICKR_API_KEY` environment variable.
    pub api_key: Option<String>,

    /// API shared secret. Public search requests are unsigned, so this is
    /// accepted but never sent.
    pub api_secret: Option<String>,

    /// Images fetched per species.
    pub per_species: u32,

    /// Comma-separated license ids accepted for training images.
    pub licenses: String,
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            per_species: scrape::DEFAULT_PER_SPECIES,
            licenses: flickr::LICENSES.to_string(),
        }
    }
}

/// Dataset scraping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Root directory for per-species image directories.
    pub dataset_dir: PathBuf,

    /// Concurrent downloads in flight.
    pub concurrent_downloads: usize,

    /// Maximum fetch rounds (initial pass plus re-fetches).
    pub max_retry_rounds: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(scrape::DEFAULT_DATASET_DIR),
            concurrent_downloads: scrape::DEFAULT_CONCURRENT_DOWNLOADS,
            max_retry_rounds: scrape::DEFAULT_RETRY_ROUNDS,
        }
    }
}

/// Species checklist settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    /// Checklist page URL.
    pub url: String,

    /// Output CSV path.
    pub output: PathBuf,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            url: checklist::DEFAULT_URL.to_string(),
            output: PathBuf::from(checklist::DEFAULT_OUTPUT),
        }
    }
}

/// External trainer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Trainer CLI program name or path.
    pub program: String,

    /// Dataset description file, relative paths resolve against the project root.
    pub data: PathBuf,

    /// Training epochs.
    pub epochs: u32,

    /// Training batch size.
    pub batch: u32,

    /// GPU device indices; empty trains on CPU.
    pub devices: Vec<u32>,

    /// Cache dataset images in memory during training.
    pub cache: bool,

    /// Checkpoint save interval in epochs.
    pub save_period: u32,

    /// Pretrained base weights to fine-tune from.
    pub base_weights: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            program: trainer::DEFAULT_PROGRAM.to_string(),
            data: PathBuf::from(trainer::DEFAULT_DATA),
            epochs: trainer::DEFAULT_EPOCHS,
            batch: trainer::DEFAULT_BATCH,
            devices: trainer::DEFAULT_DEVICES.to_vec(),
            cache: true,
            save_period: trainer::DEFAULT_SAVE_PERIOD,
            base_weights: PathBuf::from(trainer::DEFAULT_BASE_WEIGHTS),
        }
    }
}

/// Detection model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the exported ONNX model; defaults to the trained weights
    /// under the project root.
    pub path: Option<PathBuf>,

    /// Path to the labels file (one class name per line).
    pub labels: Option<PathBuf>,

    /// Square input size the model was exported with.
    pub input_size: u32,

    /// Minimum confidence threshold for detections.
    pub confidence: f32,

    /// IoU threshold for non-maximum suppression.
    pub iou: f32,

    /// Maximum detections kept per image.
    pub max_detections: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            labels: None,
            input_size: model::DEFAULT_INPUT_SIZE,
            confidence: model::DEFAULT_CONFIDENCE,
            iou: model::DEFAULT_IOU,
            max_detections: model::DEFAULT_MAX_DETECTIONS,
        }
    }
}

impl ModelConfig {
    /// Resolved model path: the explicit setting, or the exported weights
    /// under the project root.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| super::env::project_root().join(model::DEFAULT_PATH))
    }
}

/// Inference device configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Force GPU (CUDA), fail if unavailable.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Gpu => write!(f, "gpu"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

impl std::str::FromStr for InferenceDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gpu" | "cuda" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown inference device: {other}")),
        }
    }
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}
