//! Per-listing UI state carried in the operator's session.
//!
//! Each listing screen stores exactly one [`ListUiState`] under its own
//! session key, so search, pagination and the open modal survive the
//! POST-redirect-GET round trips the pages are built on.

use actix_session::Session;
use serde::{Deserialize, Serialize};

/// Session key for the categories listing state.
pub const CATEGORIES_UI: &str = "ui:categories";
/// Session key for the users listing state.
pub const USERS_UI: &str = "ui:users";

/// Which record, if any, the operator has opened.
///
/// A single value, so an edit modal and a view drawer can never be open at
/// the same time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Create,
    Edit(i32),
    View(i32),
}

/// UI state of one listing screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListUiState {
    pub search: String,
    /// 1-based page number.
    pub page: usize,
    pub selection: Selection,
    pub submitting: bool,
    /// Submitted form values kept around when a create or update failed,
    /// so the re-rendered modal shows what the operator typed.
    pub draft: Option<serde_json::Value>,
}

impl Default for ListUiState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            selection: Selection::None,
            submitting: false,
            draft: None,
        }
    }
}

impl ListUiState {
    pub fn open_create(&mut self) {
        self.selection = Selection::Create;
    }

    pub fn open_edit(&mut self, id: i32) {
        self.selection = Selection::Edit(id);
    }

    pub fn open_view(&mut self, id: i32) {
        self.selection = Selection::View(id);
    }

    pub fn close(&mut self) {
        self.selection = Selection::None;
        self.draft = None;
    }

    /// Changing the filter always returns to the first page.
    pub fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn begin_submit(&mut self) {
        self.submitting = true;
    }

    pub fn end_submit(&mut self) {
        self.submitting = false;
    }

    /// Keeps the modal open with the submitted values after a failure.
    pub fn save_draft(&mut self, draft: serde_json::Value) {
        self.draft = Some(draft);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Loads the listing state stored under `key`, or a fresh default.
pub fn load_state(session: &Session, key: &str) -> ListUiState {
    match session.get::<ListUiState>(key) {
        Ok(Some(state)) => state,
        Ok(None) => ListUiState::default(),
        Err(e) => {
            log::error!("Failed to read session state {key}: {e}");
            ListUiState::default()
        }
    }
}

/// Persists the listing state back into the session.
pub fn store_state(session: &Session, key: &str, state: &ListUiState) {
    if let Err(e) = session.insert(key, state) {
        log::error!("Failed to persist session state {key}: {e}");
    }
}

/// Drops every stored listing state, used at logout.
pub fn clear_states(session: &Session) {
    session.remove(CATEGORIES_UI);
    session.remove(USERS_UI);
}
