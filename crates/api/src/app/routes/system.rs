use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    let user = session.acting_user();
    Json(serde_json::json!({
        "authenticated": user.is_some(),
        "user_id": user.map(|u| u.user_id.to_string()),
        "email": user.and_then(|u| u.email.clone()),
    }))
}
