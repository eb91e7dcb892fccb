//! Serverless runtime entry point.
//!
//! Receives prediction jobs, runs the shared detector on the referenced
//! image and responds with the CDN URL of the annotated upload.

use birdspot::serve::{Job, ServeState, handle_job};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch adds its own timestamps.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let state = ServeState::from_env().await?;
    let state = &state;

    run(service_fn(move |event: LambdaEvent<Job>| async move {
        handle_job(state, event.payload).await.map_err(Error::from)
    }))
    .await
}
