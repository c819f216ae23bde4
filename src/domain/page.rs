use serde::{Deserialize, Serialize};

/// Number of rows per page used across every listing screen.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 8;

/// One page of a paginated listing.
///
/// Mirrors the paginator payload of the backend API: the row slice travels
/// under `data`, everything else is bookkeeping for the pager controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub current_page: usize,
    pub last_page: usize,
    pub per_page: usize,
    pub total: usize,
    /// 1-based index of the first row on this page, absent when empty.
    pub from: Option<usize>,
    /// 1-based index of the last row on this page, absent when empty.
    pub to: Option<usize>,
}

impl<T> Page<T> {
    /// Builds a page from a row slice and the overall listing counts.
    ///
    /// `last_page` is derived as `ceil(total / per_page)` and never drops
    /// below one, so an empty listing still renders as page 1 of 1.
    pub fn new(items: Vec<T>, current_page: usize, per_page: usize, total: usize) -> Self {
        let current_page = current_page.max(1);
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            let first = (current_page - 1) * per_page + 1;
            (Some(first), Some(first + items.len() - 1))
        };
        Self {
            items,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }

    /// Maps every row while keeping the pagination bookkeeping intact.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            from: self.from,
            to: self.to,
        }
    }

    /// Whether the page carries no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
