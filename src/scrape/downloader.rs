//! Streaming image downloads with bounded concurrency.

use crate::constants::scrape;
use crate::error::{Error, Result};
use crate::flickr::{FlickrClient, Photo};
use crate::interrupt;
use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Build the HTTP client used for image downloads.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(std::time::Duration::from_secs(scrape::CONNECT_TIMEOUT_SECS))
        .timeout(std::time::Duration::from_secs(scrape::REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// Download a file, streaming the body to disk.
pub async fn download_file(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::DownloadFailed {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    if !response.status().is_success() {
        return Err(Error::DownloadFailed {
            url: url.to_string(),
            source: format!("HTTP {}", response.status()).into(),
        });
    }

    let mut file = File::create(dest).await.map_err(Error::Io)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::DownloadFailed {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        file.write_all(&chunk).await.map_err(Error::Io)?;
    }

    Ok(())
}

/// Destination file for photo `index` of a species.
pub fn image_path(species_dir: &Path, species: &str, index: usize) -> PathBuf {
    species_dir.join(format!("{species}_{index}.{}", scrape::IMAGE_EXT))
}

/// Fetch photos for one species into its directory.
///
/// Downloads fan out with at most `options.concurrency` in flight.
/// Individual failures are logged and their partial files removed;
/// completeness is the verify pass's job. Returns the number of images
/// saved.
pub async fn fetch_species(
    client: &Client,
    flickr: &FlickrClient,
    species: &str,
    species_dir: &Path,
    options: &super::ScrapeOptions,
    progress: Option<&ProgressBar>,
) -> Result<usize> {
    tokio::fs::create_dir_all(species_dir)
        .await
        .map_err(Error::Io)?;

    let photos: Vec<Photo> = flickr
        .walk(species, &options.licenses, options.per_species)
        .await?;
    if let Some(pb) = progress {
        pb.set_length(photos.len() as u64);
    }

    if photos.is_empty() {
        warn!("no photos found for '{species}'");
        return Ok(0);
    }

    let tasks = photos.into_iter().enumerate().map(|(index, photo)| {
        let url = photo.source_url();
        let dest = image_path(species_dir, species, index);
        async move {
            let result = download_file(client, &url, &dest).await;
            (url, dest, result)
        }
    });

    let mut downloads =
        futures_util::stream::iter(tasks).buffer_unordered(options.concurrency);
    let mut saved = 0usize;

    while let Some((url, dest, result)) = downloads.next().await {
        if let Some(pb) = progress {
            pb.inc(1);
        }

        match result {
            Ok(()) => saved += 1,
            Err(e) => {
                warn!("download failed for {url}: {e}");
                if let Err(remove_err) = tokio::fs::remove_file(&dest).await {
                    debug!("could not remove partial file {}: {remove_err}", dest.display());
                }
            }
        }

        // Dropping the stream cancels in-flight downloads; leftovers are
        // caught by the next verify pass.
        if interrupt::cancelled() {
            break;
        }
    }

    debug!("saved {saved} image(s) for '{species}'");
    Ok(saved)
}
