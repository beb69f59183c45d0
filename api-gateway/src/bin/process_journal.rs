//! Process Journal Lambda - Reflective suggestions for mood journal entries.
//!
//! Endpoints:
//! - OPTIONS /v1/journal/suggestions - CORS preflight
//! - POST /v1/journal/suggestions - Classify the entry and suggest a next step

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{error_to_response, is_preflight, json_response, preflight_response};
use shared::models::JournalRequest;
use shared::{parse_body, Assistant};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

async fn handler(assistant: Arc<Assistant>, event: Request) -> Result<Response<Body>, Error> {
    if is_preflight(&event) {
        return preflight_response();
    }

    let request: JournalRequest = parse_body!(event.body());

    match assistant.suggest(&request) {
        Ok(suggestion) => json_response(200, &suggestion),
        Err(e) => {
            warn!("Error processing journal: {}", e);
            error_to_response(&e)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let assistant = Arc::new(Assistant::builtin()?);

    run(service_fn(move |event| {
        let assistant = Arc::clone(&assistant);
        async move { handler(assistant, event).await }
    }))
    .await
}
