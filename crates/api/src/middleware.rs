use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use freshcart_auth::{ActingUser, SessionValidator};

use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct SessionState {
    pub validator: Arc<dyn SessionValidator>,
}

/// Attach a [`SessionContext`] to every request.
///
/// Never rejects: a missing, expired, or forged token leaves the caller a guest.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    let acting_user = session_token(req.headers()).and_then(|token| {
        match state.validator.validate(token, Utc::now()) {
            Ok(claims) => Some(ActingUser::from(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable session token");
                None
            }
        }
    });

    req.extensions_mut().insert(SessionContext::new(acting_user));
    next.run(req).await
}

/// Bearer token first, then the session cookie.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    extract_bearer(headers).or_else(|| extract_cookie(headers, SESSION_COOKIE))
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
