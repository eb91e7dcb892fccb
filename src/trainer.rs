//! Delegated model training and export.
//!
//! Training and ONNX export run through an external trainer CLI (by default
//! the `yolo` program) rather than in-process. This module builds the
//! argument lists, spawns the program with inherited stdio so training
//! output streams to the terminal, and checks that expected artifacts exist
//! afterwards.

use crate::config::{self, TrainerConfig};
use crate::constants::trainer;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Resolve a possibly-relative path against the project root.
fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Path of the trained checkpoint under the project root.
pub fn trained_weights_path(root: &Path) -> PathBuf {
    root.join(trainer::TRAINED_WEIGHTS)
}

fn bool_arg(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Arguments for the training run.
///
/// The run directory is pinned so the checkpoint always lands at
/// `runs/train/weights/best.pt` regardless of the trainer's own defaults.
pub fn train_args(config: &TrainerConfig, root: &Path) -> Vec<String> {
    let mut args = vec![
        "detect".to_string(),
        "train".to_string(),
        format!("data={}", resolve(root, &config.data).display()),
        format!("model={}", config.base_weights.display()),
        format!("epochs={}", config.epochs),
        format!("batch={}", config.batch),
        format!("cache={}", bool_arg(config.cache)),
        format!("save_period={}", config.save_period),
        format!("project={}", root.join("runs").display()),
        "name=train".to_string(),
        "exist_ok=True".to_string(),
    ];

    if !config.devices.is_empty() {
        let devices: Vec<String> = config.devices.iter().map(ToString::to_string).collect();
        args.push(format!("device={}", devices.join(",")));
    }

    args
}

/// Arguments for validating the trained checkpoint.
pub fn val_args(root: &Path) -> Vec<String> {
    vec![
        "detect".to_string(),
        "val".to_string(),
        format!("model={}", trained_weights_path(root).display()),
    ]
}

/// Arguments for exporting weights to ONNX with dynamic input shapes.
pub fn export_args(weights: &Path) -> Vec<String> {
    vec![
        "export".to_string(),
        format!("model={}", weights.display()),
        "format=onnx".to_string(),
        "dynamic=True".to_string(),
    ]
}

/// Spawn the trainer program with inherited stdio and wait for it.
fn run_program(program: &str, args: &[String]) -> Result<()> {
    debug!("running: {program} {}", args.join(" "));

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::TrainerSpawn {
            program: program.to_string(),
            source: e,
        })?;

    if !status.success() {
        return Err(Error::TrainerFailed {
            program: program.to_string(),
            status,
        });
    }

    Ok(())
}

/// Train the model, then validate the resulting checkpoint.
pub fn run_training(config: &TrainerConfig) -> Result<()> {
    let root = config::project_root();

    info!(
        "training from {} for {} epochs (batch {})",
        config.base_weights.display(),
        config.epochs,
        config.batch
    );
    run_program(&config.program, &train_args(config, &root))?;

    info!("validating trained checkpoint");
    run_program(&config.program, &val_args(&root))?;

    Ok(())
}

/// Export trained weights to ONNX and return the artifact path.
///
/// `weights` overrides the default checkpoint under the project root.
pub fn run_export(config: &TrainerConfig, weights: Option<PathBuf>) -> Result<PathBuf> {
    let root = config::project_root();
    let weights = weights.unwrap_or_else(|| trained_weights_path(&root));

    if !weights.exists() {
        return Err(Error::ModelFileNotFound { path: weights });
    }

    info!("exporting {} to ONNX", weights.display());
    run_program(&config.program, &export_args(&weights))?;

    let exported = weights.with_extension("onnx");
    if !exported.exists() {
        return Err(Error::ExportMissing { path: exported });
    }

    info!("exported model written to {}", exported.display());
    Ok(exported)
}
