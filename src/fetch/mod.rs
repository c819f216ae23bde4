//! Listing fetch behavior: debounced search, request cancellation and a
//! per-operator result cache with time-based staleness.

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;
use crate::domain::category::Category;
use crate::domain::page::Page;
use crate::domain::user::User;
use crate::models::config::ServerConfig;

pub mod debounce;
pub mod query;

pub use debounce::{Debounced, Debouncer};
pub use query::{ListKey, ListView, ListViews};

/// Errors produced when resolving a listing fetch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetch was superseded by a newer one or its cache was invalidated.
    #[error("fetch cancelled")]
    Cancelled,
    /// The backend call itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Convenient alias for results returned from fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Shared fetch state handed to the route handlers.
///
/// One registry per listing screen; each registry scopes its views per
/// operator so navigation by one admin never cancels requests of another.
pub struct FetchState {
    pub categories: ListViews<Page<Category>>,
    pub users: ListViews<Page<User>>,
}

impl FetchState {
    pub fn new(config: &ServerConfig) -> Self {
        let debounce = Duration::from_millis(config.debounce_ms);
        let stale_after = Duration::from_secs(config.cache_stale_secs);
        Self {
            categories: ListViews::new(debounce, stale_after),
            users: ListViews::new(debounce, stale_after),
        }
    }

    /// Drop every cached view of the given operator, e.g. on logout.
    pub async fn purge_user(&self, user_id: i32) {
        self.categories.purge(user_id).await;
        self.users.purge(user_id).await;
    }
}
