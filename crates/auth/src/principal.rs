use freshcart_core::UserId;

use crate::SessionClaims;

/// The signed-in user on whose behalf a request runs.
///
/// Absence of an `ActingUser` means a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

impl From<SessionClaims> for ActingUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}
