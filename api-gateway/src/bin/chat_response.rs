//! Chat Response Lambda - Supportive replies for the wellness chat widget.
//!
//! Endpoints:
//! - OPTIONS /v1/chat - CORS preflight
//! - POST /v1/chat - Classify the message and pick a reply for the conversation context

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{is_preflight, json_response, preflight_response};
use shared::models::ChatRequest;
use shared::{parse_body, Assistant};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

async fn handler(assistant: Arc<Assistant>, event: Request) -> Result<Response<Body>, Error> {
    if is_preflight(&event) {
        return preflight_response();
    }

    let request: ChatRequest = parse_body!(event.body());
    let reply = assistant.respond(&request);

    json_response(200, &reply)
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
