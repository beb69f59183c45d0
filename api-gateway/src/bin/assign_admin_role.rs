//! Assign Admin Role Lambda - Grants the admin role idempotently.
//!
//! Endpoints:
//! - OPTIONS /v1/admin/assign - CORS preflight
//! - POST /v1/admin/assign - Grant admin to `{ userId }`, `{ email }`, or the caller

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::admin::{assign_admin_role, failure_response};
use shared::http::{is_preflight, json_response, preflight_response};
use shared::models::AssignAdminRequest;
use shared::{caller_from_request, parse_body, Config, PgRoleStore, PgUserDirectory, RoleGate};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: Config,
    gate: RoleGate,
    directory: PgUserDirectory,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        let pool = shared::db::create_pool(&config).await?;

        Ok(Self {
            gate: RoleGate::new(Arc::new(PgRoleStore::new(pool.clone())))
                .with_timeout(config.role_store_timeout),
            directory: PgUserDirectory::new(pool),
            config,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if is_preflight(&event) {
        return preflight_response();
    }

    let caller = caller_from_request(&event, state.config.jwt_secret.as_deref());
    let request: AssignAdminRequest = parse_body!(event.body());

    info!(
        "Admin assignment requested by {:?} (user_id: {}, email: {})",
        caller.as_ref().map(|c| c.user_id),
        request.user_id.is_some(),
        request.email.is_some()
    );

    match assign_admin_role(&state.gate, &state.directory, caller.as_ref(), request).await {
        Ok(response) => json_response(200, &response),
        Err(e) => {
            let (status, body) = failure_response(&e);
            json_response(status, &body)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
