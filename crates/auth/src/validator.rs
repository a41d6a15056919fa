use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::{SessionClaims, SessionError, validate_claims};

/// Verifies a session token and returns its claims.
pub trait SessionValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError>;
}

impl<V> SessionValidator for Arc<V>
where
    V: SessionValidator + ?Sized,
{
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        (**self).validate(token, now)
    }
}

/// HMAC-SHA256 signed JWTs carrying [`SessionClaims`].
pub struct Hs256SessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256SessionValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry lives in `expires_at` and is checked by `validate_claims`.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl SessionValidator for Hs256SessionValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
