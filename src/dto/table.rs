//! View model for the shared listing table.
//!
//! Route handlers project a domain [`Page`] into a [`TableView`] so the
//! template only walks columns, rows and a pagination window without
//! touching domain types. The same template renders both as part of a
//! full page and standalone as the live search fragment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::page::Page;

/// Visual tone of a badge cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Danger,
    Info,
    Muted,
}

/// One table cell, tagged so the template can branch on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Primary text with an optional muted second line.
    Text { value: String, muted: Option<String> },
    /// Colored status badge.
    Badge { value: String, tone: Tone },
    /// Date and time rendered on two lines.
    Timestamp { date: String, time: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub label: &'static str,
}

impl Column {
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }
}

/// One rendered row plus the flags driving its action menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: i32,
    /// Display name interpolated into confirmation prompts.
    pub name: String,
    pub cells: Vec<Cell>,
    pub is_active: bool,
    pub deleted: bool,
}

/// Pagination controls for one rendered page.
///
/// Page buttons are bounded to two on each side of the current page, so
/// seventeen rows at eight per page produce the buttons 1 to 3 while a
/// long listing never shows more than five.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    pub prev_page: usize,
    pub next_page: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PageWindow {
    /// The window around the current page, or `None` when a single page
    /// holds everything and no controls are needed.
    pub fn compute<T>(page: &Page<T>) -> Option<Self> {
        if page.last_page <= 1 {
            return None;
        }
        let current = page.current_page.clamp(1, page.last_page);
        let first = current.saturating_sub(2).max(1);
        let last = (current + 2).min(page.last_page);
        Some(Self {
            pages: (first..=last).collect(),
            current,
            prev_page: current.saturating_sub(1).max(1),
            next_page: (current + 1).min(page.last_page),
            prev_disabled: current == 1,
            next_disabled: current == page.last_page,
        })
    }
}

/// Everything the shared table template needs to render one listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Columns spanned by the empty-state row, data columns plus actions.
    pub colspan: usize,
    /// 1-based index of the first visible row, 0 when the page is empty.
    pub from: usize,
    /// 1-based index of the last visible row, 0 when the page is empty.
    pub to: usize,
    pub total: usize,
    pub window: Option<PageWindow>,
    /// Disables search, pager and row actions while a submission runs.
    pub is_loading: bool,
}

impl TableView {
    pub fn new<T>(columns: Vec<Column>, page: &Page<T>, rows: Vec<Row>, is_loading: bool) -> Self {
        Self {
            colspan: columns.len() + 1,
            columns,
            rows,
            from: page.from.unwrap_or(0),
            to: page.to.unwrap_or(0),
            total: page.total,
            window: PageWindow::compute(page),
            is_loading,
        }
    }
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

pub fn status_badge(is_active: bool) -> Cell {
    if is_active {
        Cell::Badge {
            value: "Aktif".to_string(),
            tone: Tone::Success,
        }
    } else {
        Cell::Badge {
            value: "Tidak Aktif".to_string(),
            tone: Tone::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(len: usize, current_page: usize, total: usize) -> Page<u32> {
        Page::new(vec![0; len], current_page, 8, total)
    }

    #[test]
    fn seventeen_rows_paginate_into_three_buttons() {
        let window = PageWindow::compute(&page_of(8, 1, 17)).unwrap();
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(window.prev_disabled);
        assert!(!window.next_disabled);
    }

    #[test]
    fn window_is_bounded_around_the_current_page() {
        let window = PageWindow::compute(&page_of(8, 5, 80)).unwrap();
        assert_eq!(window.pages, vec![3, 4, 5, 6, 7]);
        assert_eq!(window.prev_page, 4);
        assert_eq!(window.next_page, 6);
        assert!(!window.prev_disabled);
        assert!(!window.next_disabled);
    }

    #[test]
    fn last_page_disables_next() {
        let window = PageWindow::compute(&page_of(1, 3, 17)).unwrap();
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert_eq!(window.next_page, 3);
        assert!(window.next_disabled);
    }

    #[test]
    fn single_page_has_no_window() {
        assert_eq!(PageWindow::compute(&page_of(5, 1, 5)), None);
    }

    #[test]
    fn empty_page_renders_a_zeroed_summary() {
        let view = TableView::new(
            vec![Column::new("No"), Column::new("Nama")],
            &page_of(0, 1, 0),
            Vec::new(),
            false,
        );
        assert_eq!(view.from, 0);
        assert_eq!(view.to, 0);
        assert_eq!(view.total, 0);
        assert_eq!(view.colspan, 3);
        assert!(view.window.is_none());
    }
}
