use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, UserId, UserName, UserRole};

/// Canonical user account record as served by the backend API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the account has been soft-deleted on the backend.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the record is soft-deleted and eligible for restore.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub password: String,
}

/// Fields accepted when updating an existing [`User`].
///
/// `password` is only sent when the operator filled it in, otherwise the
/// backend keeps the current one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserUpdate {
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
