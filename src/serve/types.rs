//! Job and response payloads for the serverless endpoint.

use crate::output::Detection;
use serde::{Deserialize, Serialize};

/// Incoming prediction job.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Job input block.
    pub input: Option<JobInput>,
}

/// Input block of a prediction job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    /// URL of the image to run detection on.
    pub url: Option<String>,
}

impl Job {
    /// The image URL, when the job carries one.
    pub fn url(&self) -> Option<&str> {
        self.input.as_ref().and_then(|input| input.url.as_deref())
    }
}

/// Handler response body.
///
/// Client mistakes (a job without a URL) are reported as an error object
/// rather than a failed invocation.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobOutcome {
    /// Prediction ran and the annotated image was uploaded.
    Completed {
        /// Public URL of the annotated image.
        url: String,
        /// Detections found in the image.
        predictions: Vec<Detection>,
    },
    /// The job was rejected before prediction.
    Rejected {
        /// Human-readable reason.
        error: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::BoundingBox;

    #[test]
    fn test_job_url_extraction() {
        let job: Job = serde_json::from_str(r#"{"input":{"url":"https://example.com/a.jpg"}}"#)
            .unwrap();
        assert_eq!(job.url(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn test_job_without_url() {
        let job: Job = serde_json::from_str(r#"{"input":{}}"#).unwrap();
        assert_eq!(job.url(), None);

        let job: Job = serde_json::from_str("{}").unwrap();
        assert_eq!(job.url(), None);
    }

    #[test]
    fn test_rejected_outcome_shape() {
        let outcome = JobOutcome::Rejected {
            error: "URL does not exist.".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"error": "URL does not exist."}));
    }

    #[test]
    fn test_completed_outcome_shape() {
        let outcome = JobOutcome::Completed {
            url: "https://cdn.example.com/abc.png".to_string(),
            predictions: vec![Detection::new(
                "Mallard",
                3,
                0.91234,
                BoundingBox {
                    x1: 10.0,
                    y1: 20.0,
                    x2: 110.0,
                    y2: 220.0,
                },
            )],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["url"], "https://cdn.example.com/abc.png");
        assert_eq!(json["predictions"][0]["name"], "Mallard");
        assert_eq!(json["predictions"][0]["box"]["x1"], 10.0);
    }
}
