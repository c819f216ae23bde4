use std::future::Future;

use thiserror::Error;

use crate::domain::auth::{AuthSession, Credentials, Registration};
use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::page::Page;
use crate::domain::types::{CategoryId, UserId, UserRole};
use crate::domain::user::{NewUser, User, UserUpdate};

pub mod auth;
pub mod categories;
pub mod client;
pub mod users;

/// Errors produced by the backend API gateway.
///
/// Carries owned strings instead of transport errors so results can be
/// cloned, compared in tests and broadcast to concurrent waiters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The bearer token was missing, expired or revoked (HTTP 401).
    #[error("authentication required")]
    Unauthorized,
    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found")]
    NotFound,
    /// The backend rejected the request, usually failed validation (other 4xx).
    #[error("{0}")]
    Validation(String),
    /// The backend failed to process the request (5xx).
    #[error("server error: status {0}")]
    Server(u16),
    /// The request never produced a response: connect failure or timeout.
    #[error("network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Convenient alias for results returned from gateway methods.
pub type ApiResult<T> = Result<T, ApiError>;

/// Query parameters used when listing or searching records.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ListQuery {
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// Full-text search string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        if !search.trim().is_empty() {
            self.search = Some(search);
        }
        self
    }
}

/// Gateway implementation backed by the remote REST API.
///
/// The underlying `reqwest::Client` holds a connection pool and is cheap to
/// clone, allowing the backend to be passed around freely between handlers.
#[derive(Clone)]
pub struct RestBackend {
    client: client::RestClient,
}

impl RestBackend {
    /// Create a new backend from an established HTTP client.
    pub fn new(client: client::RestClient) -> Self {
        Self { client }
    }

    fn client(&self) -> &client::RestClient {
        &self.client
    }
}

/// Read-only operations for category records.
pub trait CategoryReader {
    /// List categories matching the supplied query parameters.
    fn list_categories(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> impl Future<Output = ApiResult<Page<Category>>> + Send;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(
        &self,
        token: &str,
        id: CategoryId,
    ) -> impl Future<Output = ApiResult<Category>> + Send;
}

/// Write operations for category records.
pub trait CategoryWriter {
    /// Persist a new category, returning the stored record.
    fn create_category(
        &self,
        token: &str,
        category: &NewCategory,
    ) -> impl Future<Output = ApiResult<Category>> + Send;
    /// Update name, description and status of a category.
    fn update_category(
        &self,
        token: &str,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> impl Future<Output = ApiResult<Category>> + Send;
    /// Soft-delete a category.
    fn delete_category(
        &self,
        token: &str,
        id: CategoryId,
    ) -> impl Future<Output = ApiResult<()>> + Send;
    /// Restore a soft-deleted category.
    fn restore_category(
        &self,
        token: &str,
        id: CategoryId,
    ) -> impl Future<Output = ApiResult<Category>> + Send;
    /// Flip the active flag of a category.
    fn toggle_category_status(
        &self,
        token: &str,
        id: CategoryId,
    ) -> impl Future<Output = ApiResult<Category>> + Send;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    /// List users matching the supplied query parameters.
    fn list_users(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> impl Future<Output = ApiResult<Page<User>>> + Send;
    /// Retrieve a user by its identifier.
    fn get_user_by_id(
        &self,
        token: &str,
        id: UserId,
    ) -> impl Future<Output = ApiResult<User>> + Send;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new user account, returning the stored record.
    fn create_user(
        &self,
        token: &str,
        user: &NewUser,
    ) -> impl Future<Output = ApiResult<User>> + Send;
    /// Update profile, role, status and optionally the password of a user.
    fn update_user(
        &self,
        token: &str,
        id: UserId,
        update: &UserUpdate,
    ) -> impl Future<Output = ApiResult<User>> + Send;
    /// Soft-delete a user account.
    fn delete_user(&self, token: &str, id: UserId) -> impl Future<Output = ApiResult<()>> + Send;
    /// Restore a soft-deleted user account.
    fn restore_user(
        &self,
        token: &str,
        id: UserId,
    ) -> impl Future<Output = ApiResult<User>> + Send;
    /// Flip the active flag of a user account.
    fn toggle_user_status(
        &self,
        token: &str,
        id: UserId,
    ) -> impl Future<Output = ApiResult<User>> + Send;
    /// Change the role of a user account.
    fn update_user_role(
        &self,
        token: &str,
        id: UserId,
        role: UserRole,
    ) -> impl Future<Output = ApiResult<User>> + Send;
}

/// Authentication operations against the backend.
pub trait AuthGateway {
    /// Exchange credentials for a bearer token and the account record.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = ApiResult<AuthSession>> + Send;
    /// Create a new account. The caller still has to log in afterwards.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = ApiResult<User>> + Send;
    /// Invalidate the bearer token on the backend.
    fn logout(&self, token: &str) -> impl Future<Output = ApiResult<()>> + Send;
    /// Fetch the account behind a bearer token.
    fn current_user(&self, token: &str) -> impl Future<Output = ApiResult<User>> + Send;
}
