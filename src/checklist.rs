//! Species checklist acquisition.
//!
//! Fetches the checklist page, extracts species display names, and stores
//! them as a CSV with one species per row. The page lists each species in a
//! `<p class="species">` block whose first text run is the common name.

use crate::error::{Error, Result};
use regex::Regex;
use reqwest::Client;
use std::path::Path;
use tracing::debug;

/// Fetch the checklist page and extract species names in page order.
///
/// An empty result is treated as an error since it almost always means the
/// page markup changed.
pub async fn fetch_checklist(client: &Client, url: &str) -> Result<Vec<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| Error::HttpRequest {
            url: url.to_string(),
            source: e,
        })?;

    let body = response.text().await.map_err(|e| Error::HttpRequest {
        url: url.to_string(),
        source: e,
    })?;

    let species = extract_species(&body)?;
    debug!(count = species.len(), url, "extracted species entries");

    if species.is_empty() {
        return Err(Error::ChecklistEmpty {
            url: url.to_string(),
        });
    }

    Ok(species)
}

/// Extract species names from checklist page HTML.
///
/// Matches every paragraph carrying the `species` class and takes the first
/// non-empty text run of the block, which holds the common name; trailing
/// runs carry the scientific name and status markers.
pub fn extract_species(html: &str) -> Result<Vec<String>> {
    let block_re = Regex::new(r#"(?is)<p[^>]*class\s*=\s*["'][^"']*species[^"']*["'][^>]*>(.*?)</p>"#)
        .map_err(|e| Error::Internal {
            message: format!("species block pattern failed to compile: {e}"),
        })?;
    let tag_re = Regex::new(r"<[^>]*>").map_err(|e| Error::Internal {
        message: format!("tag pattern failed to compile: {e}"),
    })?;

    let mut species = Vec::new();

    for capture in block_re.captures_iter(html) {
        let block = &capture[1];

        let name = tag_re
            .split(block)
            .map(str::trim)
            .find(|run| !run.is_empty())
            .map(decode_entities);

        if let Some(name) = name {
            species.push(name);
        }
    }

    Ok(species)
}

/// Decode the handful of HTML entities that show up in species names.
fn decode_entities(s: &str) -> String {
    s.replace("&#39;", "'")
        .replace("&#8217;", "\u{2019}")
        .replace("&rsquo;", "\u{2019}")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Write species names to a CSV file, one species per row.
pub fn write_checklist(path: &Path, species: &[String]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::SpeciesListWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    for name in species {
        writer
            .write_record([name])
            .map_err(|e| Error::SpeciesListWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    writer.flush().map_err(Error::Io)
}

/// Read species names from a CSV file.
///
/// Accepts both one-species-per-row and legacy single-row layouts; blank
/// fields are dropped.
pub fn read_species_file(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::SpeciesListRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut species = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| Error::SpeciesListRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        for field in record.iter() {
            let trimmed = field.trim();
            if !trimmed.is_empty() {
                species.push(trimmed.to_string());
            }
        }
    }

    if species.is_empty() {
        return Err(Error::SpeciesListEmpty {
            path: path.to_path_buf(),
        });
    }

    Ok(species)
}
