//! ONNX session construction and device selection.

use crate::config::InferenceDevice;
use crate::constants::model;
use crate::error::{Error, Result};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use std::path::Path;
use tracing::{info, warn};

/// Check that a model path names an existing, natively loadable model.
///
/// Only ONNX models load for inference here. Other recognized export
/// formats get a pointer to re-export; everything else is rejected.
pub fn validate_model_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::ModelFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == model::NATIVE_EXTENSION {
        return Ok(());
    }

    if model::EXPORT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::UnsupportedModelFormat { format: extension });
    }

    Err(Error::InvalidModelFormat {
        path: path.to_path_buf(),
    })
}

#[cfg(feature = "cuda")]
fn gpu_provider() -> Option<ort::execution_providers::ExecutionProviderDispatch> {
    use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};

    let provider = CUDAExecutionProvider::default();
    match provider.is_available() {
        Ok(true) => Some(provider.build()),
        Ok(false) => None,
        Err(e) => {
            tracing::debug!("CUDA availability check failed: {e}");
            None
        }
    }
}

#[cfg(not(feature = "cuda"))]
fn gpu_provider() -> Option<ort::execution_providers::ExecutionProviderDispatch> {
    None
}

fn runtime_error(e: ort::Error) -> Error {
    Error::RuntimeInitialization {
        reason: e.to_string(),
    }
}

/// Build an ONNX session for the model, honoring the device request.
///
/// Auto mode falls back to CPU silently; an explicit GPU request warns
/// when no provider is available.
pub fn build_session(path: &Path, device: InferenceDevice) -> Result<Session> {
    validate_model_path(path)?;

    let mut builder = Session::builder()
        .map_err(runtime_error)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(runtime_error)?;

    match device {
        InferenceDevice::Cpu => {
            info!("Requested device: CPU");
        }
        InferenceDevice::Auto => {
            if let Some(provider) = gpu_provider() {
                info!("Auto mode: CUDA available, attempting GPU");
                builder = builder
                    .with_execution_providers([provider])
                    .map_err(runtime_error)?;
            } else {
                info!("Auto mode: no GPU provider available, using CPU");
            }
        }
        InferenceDevice::Gpu => {
            if let Some(provider) = gpu_provider() {
                info!("Requested device: CUDA");
                builder = builder
                    .with_execution_providers([provider])
                    .map_err(runtime_error)?;
            } else {
                warn!("GPU requested but no GPU provider available, using CPU");
            }
        }
    }

    let session = builder
        .commit_from_file(path)
        .map_err(|e| Error::DetectorBuild {
            reason: e.to_string(),
        })?;

    debug!("session loaded from {}", path.display());
    Ok(session)
}
