use axum::{routing::get, Router};

pub mod orders;
pub mod system;

/// Router for all session-aware endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/orders", orders::router())
}
