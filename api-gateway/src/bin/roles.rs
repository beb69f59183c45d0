//! Role Management Lambda - Route guards and the admin user-management screen.
//!
//! Endpoints:
//! - GET /v1/roles/me - Caller's roles and capabilities
//! - GET /v1/roles/{user_id} - List a user's role assignments (admin)
//! - POST /v1/roles/{user_id} - Assign a role (admin)
//! - DELETE /v1/roles/{user_id}/{role} - Remove a role (admin)

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{error_to_response, is_preflight, json_response, preflight_response};
use shared::{caller_from_request, role_api, Config, PgRoleStore, RoleGate};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: Config,
    gate: RoleGate,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        let pool = shared::db::create_pool(&config).await?;

        Ok(Self {
            gate: RoleGate::new(Arc::new(PgRoleStore::new(pool)))
                .with_timeout(config.role_store_timeout),
            config,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if is_preflight(&event) {
        return preflight_response();
    }

    let path = event.uri().path();
    let method = event.method().as_str();

    info!("Roles request: {} {}", method, path);

    let caller = caller_from_request(&event, state.config.jwt_secret.as_deref()).map(|user| user.user_id);

    match role_api::handle(&state.gate, caller, method, path, event.body().as_ref()).await {
        Ok(reply) => json_response(reply.status(), &reply),
        Err(e) => error_to_response(&e),
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
