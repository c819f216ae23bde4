use serde::{Deserialize, Serialize};

use crate::domain::types::UserRole;
use crate::domain::user::User;

/// Authenticated operator stored in the session cookie.
///
/// Carries the bearer token issued by the backend at login so every
/// follow-up API call can authenticate without re-prompting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub access_token: String,
}

impl SessionUser {
    /// Whether this operator may manage other accounts.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<AuthSession> for SessionUser {
    fn from(session: AuthSession) -> Self {
        Self {
            id: session.user.id.into(),
            name: session.user.name.into_inner(),
            email: session.user.email.into_inner(),
            role: session.user.role,
            access_token: session.access_token,
        }
    }
}

/// Login credentials forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Successful authentication response: the account plus its bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: User,
}
