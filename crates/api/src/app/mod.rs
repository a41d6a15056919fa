//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the order assembler
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use freshcart_auth::Hs256SessionValidator;
use freshcart_infra::config::AppConfig;
use freshcart_inventory::StoreError;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router from configuration (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let services = Arc::new(AppServices::from_config(config).await?);
    Ok(build_router(services, &config.jwt_secret))
}

/// Build the router around already-constructed services.
pub fn build_router(services: Arc<AppServices>, jwt_secret: &str) -> Router {
    let session_state = middleware::SessionState {
        validator: Arc::new(Hs256SessionValidator::new(jwt_secret)),
    };

    // Every routed request gets a session context; guests are allowed through.
    let sessioned = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(axum::middleware::from_fn_with_state(
                session_state,
                middleware::session_middleware,
            )),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(sessioned)
}
