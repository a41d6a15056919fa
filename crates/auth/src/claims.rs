use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use freshcart_core::UserId;

/// Session token claims (transport-agnostic).
///
/// The minimal set of claims FreshCart expects once a token has been decoded and
/// its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the signed-in user.
    pub sub: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    /// Bad signature, wrong algorithm, or undecodable payload.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Deterministically validate session claims against `now`.
///
/// Only the time window is checked here; signatures are verified by the
/// [`crate::SessionValidator`] implementation.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), SessionError> {
    if claims.expires_at <= claims.issued_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}
