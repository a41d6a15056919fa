use freshcart_auth::ActingUser;
use freshcart_core::UserId;

/// Session context for a request.
///
/// Always present on routed requests; `acting_user` is `None` for guests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    acting_user: Option<ActingUser>,
}

impl SessionContext {
    pub fn new(acting_user: Option<ActingUser>) -> Self {
        Self { acting_user }
    }

    pub fn acting_user(&self) -> Option<&ActingUser> {
        self.acting_user.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.acting_user.as_ref().map(|u| u.user_id)
    }
}
