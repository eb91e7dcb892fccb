//! Environment variable resolution.

use crate::constants::env;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Read a required environment variable.
///
/// `purpose` ends up in the error message so the user knows what the
/// variable is for and where to put it.
pub fn require_env(name: &str, purpose: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingEnv {
            name: name.to_string(),
            purpose: purpose.to_string(),
        }),
    }
}

/// Read an optional environment variable, treating empty values as unset.
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Project root for model artifacts and training data.
///
/// Honors `PROJECT_DIR`, falling back to the current directory.
pub fn project_root() -> PathBuf {
    std::env::var_os(env::PROJECT_DIR).map_or_else(|| PathBuf::from("."), PathBuf::from)
}
