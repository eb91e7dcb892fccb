//! Class label resolution.
//!
//! Labels come from an explicit file (one class name per line) or, failing
//! that, from the `names` entry exported models embed in their metadata.

use crate::error::{Error, Result};
use ort::session::Session;
use std::path::Path;
use tracing::debug;

/// Read labels from a file, one class name per line.
pub fn read_labels_file(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::LabelsFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let labels: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if labels.is_empty() {
        return Err(Error::DetectorBuild {
            reason: format!("labels file '{}' contains no class names", path.display()),
        });
    }

    Ok(labels)
}

/// Extract labels from the model's `names` metadata entry, if present.
pub fn labels_from_metadata(session: &Session) -> Result<Option<Vec<String>>> {
    let metadata = session.metadata().map_err(|e| Error::DetectorBuild {
        reason: format!("failed to read model metadata: {e}"),
    })?;

    let Some(raw) = metadata.custom("names").map_err(|e| Error::DetectorBuild {
        reason: format!("failed to read model metadata: {e}"),
    })?
    else {
        return Ok(None);
    };

    debug!("parsing class names from model metadata");
    parse_names_map(&raw).map(Some)
}

/// Parse a `{0: 'Mallard', 1: "Cooper's Hawk"}` map literal into an
/// ordered label list.
pub(crate) fn parse_names_map(raw: &str) -> Result<Vec<String>> {
    let entry_re = regex::Regex::new(r#"(\d+)\s*:\s*(?:'([^']*)'|"([^"]*)")"#).map_err(|e| {
        Error::Internal {
            message: format!("invalid label pattern: {e}"),
        }
    })?;

    let mut entries: Vec<(usize, String)> = Vec::new();
    for captures in entry_re.captures_iter(raw) {
        let index: usize = captures
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| Error::DetectorBuild {
                reason: format!("unparseable class index in model names: {raw}"),
            })?;
        let name = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::DetectorBuild {
                reason: format!("unparseable class name in model names: {raw}"),
            })?;
        entries.push((index, name));
    }

    if entries.is_empty() {
        return Err(Error::DetectorBuild {
            reason: format!("model names metadata has no entries: {raw}"),
        });
    }

    entries.sort_by_key(|(index, _)| *index);
    Ok(entries.into_iter().map(|(_, name)| name).collect())
}
