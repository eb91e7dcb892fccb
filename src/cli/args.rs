//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bird species detection in photos using YOLO models.
#[derive(Debug, Parser)]
#[command(name = "birdspot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to run predictions on.
    pub inputs: Vec<PathBuf>,

    /// Common options for prediction.
    #[command(flatten)]
    pub predict: PredictArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the species checklist and save it to CSV.
    Checklist {
        /// Checklist page URL (default: California Bird Records Committee).
        #[arg(long)]
        url: Option<String>,

        /// Output CSV path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download training images for each species from the photo API.
    Scrape {
        /// Species to scrape (repeatable); overrides the species list.
        #[arg(short, long)]
        species: Vec<String>,

        /// CSV file of species to scrape.
        #[arg(long, conflicts_with = "species")]
        species_list: Option<PathBuf>,

        /// Root directory for per-species image directories.
        #[arg(long)]
        dataset_dir: Option<PathBuf>,

        /// Images to fetch per species.
        #[arg(long)]
        per_species: Option<u32>,

        /// Concurrent downloads in flight.
        #[arg(long)]
        concurrency: Option<usize>,

        /// Maximum fetch rounds (initial pass plus re-fetches).
        #[arg(long)]
        retry_rounds: Option<usize>,
    },
    /// Scan the dataset for empty directories and broken images.
    Verify {
        /// Root directory of per-species image directories.
        #[arg(long)]
        dataset_dir: Option<PathBuf>,
    },
    /// Fine-tune detection weights by invoking the external trainer.
    Train {
        /// Dataset description file (default: data.yaml under the project root).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Training epochs.
        #[arg(long)]
        epochs: Option<u32>,

        /// Training batch size.
        #[arg(long)]
        batch: Option<u32>,

        /// GPU device indices (comma-separated); empty trains on CPU.
        #[arg(long, value_delimiter = ',')]
        devices: Option<Vec<u32>>,

        /// Do not cache dataset images in memory.
        #[arg(long)]
        no_cache: bool,

        /// Checkpoint save interval in epochs.
        #[arg(long)]
        save_period: Option<u32>,

        /// Pretrained base weights to fine-tune from.
        #[arg(long)]
        base_weights: Option<PathBuf>,
    },
    /// Export trained weights to ONNX for native inference.
    Export {
        /// Trained weights to export (default: best.pt under the project runs).
        #[arg(short, long)]
        weights: Option<PathBuf>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the prediction command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct PredictArgs {
    /// Path to the exported ONNX model (overrides config).
    #[arg(short, long, env = "BIRDSPOT_MODEL")]
    pub model: Option<PathBuf>,

    /// Path to the labels file, one class name per line (overrides config).
    #[arg(long, env = "BIRDSPOT_LABELS")]
    pub labels: Option<PathBuf>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "BIRDSPOT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Minimum confidence threshold (0.0-1.0).
    #[arg(short = 'c', long, value_parser = parse_confidence, env = "BIRDSPOT_CONFIDENCE")]
    pub confidence: Option<f32>,

    /// IoU threshold for non-maximum suppression (0.0-1.0).
    #[arg(long, value_parser = parse_iou, env = "BIRDSPOT_IOU")]
    pub iou: Option<f32>,

    /// Write a JSON prediction report next to each annotated image.
    #[arg(long)]
    pub save_json: bool,

    /// Print prediction JSON for each image.
    #[arg(short, long)]
    pub debug: bool,

    /// Overwrite existing result images.
    #[arg(short, long)]
    pub force: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable CUDA GPU acceleration.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,
}

/// Parse and validate confidence value.
fn parse_confidence(s: &str) -> Result<f32, String> {
    parse_unit_interval(s, "confidence")
}

/// Parse and validate IoU value.
fn parse_iou(s: &str) -> Result<f32, String> {
    parse_unit_interval(s, "iou")
}

/// Parse and validate a value in 0.0-1.0.
fn parse_unit_interval(s: &str, name: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{name} must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}
