//! Job handling for the serverless endpoint.

use crate::config::{self, InferenceDevice, ModelConfig};
use crate::constants::{env, serve};
use crate::error::{Error, Result};
use crate::inference::{Detector, DetectorParams};
use crate::output::annotate;
use crate::scrape;
use crate::serve::{Job, JobOutcome};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Long-lived state shared across invocations.
///
/// The detector mutates its session on every run, so it sits behind a
/// mutex even though the runtime drives one job at a time.
pub struct ServeState {
    detector: Mutex<Detector>,
    http: reqwest::Client,
    s3: aws_sdk_s3::Client,
    bucket: String,
    cdn_domain: String,
}

impl ServeState {
    /// Build the shared state from the environment.
    ///
    /// Loads the model packed next to the binary, reads the bucket and CDN
    /// settings, and resolves AWS credentials through the SDK default chain.
    pub async fn from_env() -> Result<Self> {
        let bucket = config::require_env(env::AWS_BUCKET, "S3 bucket for annotated images")?;
        let cdn_domain = config::require_env(
            env::CLOUDFRONT_URL,
            "CDN domain fronting the output bucket",
        )?;

        let detector = Detector::new(
            Path::new(serve::DEFAULT_MODEL),
            None,
            InferenceDevice::Auto,
            DetectorParams::from(&ModelConfig::default()),
        )?;

        let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        Ok(Self {
            detector: Mutex::new(detector),
            http: scrape::build_client()?,
            s3: aws_sdk_s3::Client::new(&aws),
            bucket,
            cdn_domain,
        })
    }
}

/// Run one prediction job end to end.
///
/// Fetches the image, runs detection, uploads the annotated image to S3
/// and returns its CDN URL together with the detections. A job without a
/// URL gets a rejection object instead of a failed invocation.
pub async fn handle_job(state: &ServeState, job: Job) -> Result<JobOutcome> {
    let Some(url) = job.url() else {
        return Ok(JobOutcome::Rejected {
            error: serve::ERROR_URL_MISSING.to_string(),
        });
    };

    info!("Fetching image from {url}");
    let bytes = fetch_image(&state.http, url).await?;
    let image = image::load_from_memory(&bytes).map_err(|e| Error::ImageDecode {
        path: url.into(),
        source: e,
    })?;

    let detections = {
        let mut detector = state.detector.lock().await;
        detector.detect(&image)?
    };
    info!("Found {} detections", detections.len());

    let annotated = annotate::annotate(&image, &detections);
    let png = annotate::encode_png(&annotated)?;

    let key = format!("{}.{}", Uuid::new_v4(), serve::OUTPUT_EXT);
    state
        .s3
        .put_object()
        .bucket(&state.bucket)
        .key(&key)
        .content_type(serve::OUTPUT_CONTENT_TYPE)
        .body(png.into())
        .send()
        .await
        .map_err(|e| Error::UploadFailed {
            bucket: state.bucket.clone(),
            key: key.clone(),
            source: Box::new(e),
        })?;
    info!("Uploaded annotated image as {key}");

    Ok(JobOutcome::Completed {
        url: format!("https://{}/{key}", state.cdn_domain),
        predictions: detections,
    })
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::HttpRequest {
            url: url.to_string(),
            source: e,
        })?;

    if !response.status().is_success() {
        return Err(Error::DownloadFailed {
            url: url.to_string(),
            source: format!("HTTP {}", response.status()).into(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| Error::HttpRequest {
        url: url.to_string(),
        source: e,
    })?;
    Ok(bytes.to_vec())
}
