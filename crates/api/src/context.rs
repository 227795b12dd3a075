use estoque_auth::Role;
use estoque_core::UserId;

/// Authenticated identity for a request (user + roles from the token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user_id: UserId,
    roles: Vec<Role>,
}

impl CurrentUser {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}
