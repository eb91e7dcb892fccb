//! Flickr dataset scraping with verified completeness.
//!
//! A scrape run downloads photos for every requested species, then scans
//! what landed on disk. Files that are empty or fail to decode are removed
//! and their species re-fetched, up to a bounded number of rounds. The run
//! either ends with a clean dataset or an error naming what is still broken.

mod downloader;
mod verify;

pub use downloader::{build_client, download_file, fetch_species, image_path};
pub use verify::{DatasetReport, Defect, SpeciesReport, scan_dataset, scan_species_dir};

use crate::error::{Error, Result};
use crate::flickr::FlickrClient;
use crate::interrupt;
use crate::output::progress::{create_download_progress, finish_progress};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Options controlling a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Root directory for the dataset, one subdirectory per species.
    pub dataset_dir: PathBuf,
    /// Photos requested per species.
    pub per_species: u32,
    /// Maximum concurrent downloads.
    pub concurrency: usize,
    /// Fetch/verify rounds before giving up on defective files.
    pub max_rounds: u32,
    /// Comma-separated Flickr license ids to accept.
    pub licenses: String,
    /// Suppress progress bars.
    pub quiet: bool,
}

/// Outcome of a completed scrape run.
#[derive(Debug, Default)]
pub struct ScrapeSummary {
    /// Number of species fetched.
    pub species: usize,
    /// Downloads that completed, re-fetches included.
    pub images_downloaded: usize,
    /// Fetch/verify rounds used.
    pub rounds: u32,
}

fn remove_defective_files(report: &SpeciesReport) {
    for defect in &report.defects {
        if !defect.is_file() {
            continue;
        }
        if let Err(e) = std::fs::remove_file(defect.path()) {
            debug!("could not remove {}: {e}", defect.path().display());
        }
    }
}

/// Download photos for every species, then verify and re-fetch defective
/// species until the dataset is clean or the retry rounds are used up.
pub async fn run_scrape(
    flickr: &FlickrClient,
    options: &ScrapeOptions,
    species: &[String],
) -> Result<ScrapeSummary> {
    if species.is_empty() {
        return Err(Error::Internal {
            message: "no species to scrape".to_string(),
        });
    }

    tokio::fs::create_dir_all(&options.dataset_dir)
        .await
        .map_err(Error::Io)?;

    let client = build_client()?;
    let mut summary = ScrapeSummary {
        species: species.len(),
        ..Default::default()
    };
    let mut targets: Vec<String> = species.to_vec();

    for round in 1..=options.max_rounds {
        summary.rounds = round;
        if round > 1 {
            info!(
                "re-fetching {} defective species (round {round}/{})",
                targets.len(),
                options.max_rounds
            );
        }

        for name in &targets {
            if interrupt::cancelled() {
                return Err(Error::Interrupted);
            }

            info!("fetching photos for '{name}'");
            let dir = options.dataset_dir.join(name);
            let progress = create_download_progress(name, !options.quiet);
            let saved =
                fetch_species(&client, flickr, name, &dir, options, progress.as_ref()).await?;
            finish_progress(progress, "done");
            summary.images_downloaded += saved;
        }

        if interrupt::cancelled() {
            return Err(Error::Interrupted);
        }

        let mut defective = Vec::new();
        for name in &targets {
            let report = scan_species_dir(&options.dataset_dir.join(name))?;
            if report.is_clean() {
                continue;
            }
            for defect in &report.defects {
                warn!("{defect}");
            }
            remove_defective_files(&report);
            defective.push(name.clone());
        }

        if defective.is_empty() {
            info!("dataset verified clean after {round} round(s)");
            return Ok(summary);
        }

        if round == options.max_rounds {
            return Err(Error::DatasetIncomplete {
                defects: defective.len(),
                rounds: options.max_rounds as usize,
            });
        }

        targets = defective;
    }

    Err(Error::Internal {
        message: "scrape requires at least one round".to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_species_list_is_rejected() {
        let options = ScrapeOptions {
            dataset_dir: PathBuf::from("data"),
            per_species: 10,
            concurrency: 4,
            max_rounds: 3,
            licenses: "1,2,3".to_string(),
            quiet: true,
        };
        let flickr = FlickrClient::new(reqwest::Client::new(), "key");
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(run_scrape(&flickr, &options, &[]));
        assert!(matches!(result, Err(Error::Internal { .. })));
    }

    #[test]
    fn test_image_path_layout() {
        let dir = PathBuf::from("data/Snowy Egret");
        let path = image_path(&dir, "Snowy Egret", 7);
        assert_eq!(path, PathBuf::from("data/Snowy Egret/Snowy Egret_7.jpg"));
    }
}
