use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::page::Page;
use crate::dto::table::{Cell, Column, Row, TableView, format_date, format_time, status_badge};

/// Category projected for templates: strings only, timestamps preformatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    /// Empty when the record has no description.
    pub description: String,
    pub is_active: bool,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            description: value.description.clone().unwrap_or_default(),
            is_active: value.is_active,
            deleted: value.is_deleted(),
            created_at: format!(
                "{} {}",
                format_date(&value.created_at),
                format_time(&value.created_at)
            ),
            updated_at: format!(
                "{} {}",
                format_date(&value.updated_at),
                format_time(&value.updated_at)
            ),
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("No"),
        Column::new("Nama Kategori"),
        Column::new("Status"),
        Column::new("Dibuat"),
        Column::new("Terakhir Update"),
    ]
}

/// Builds the category listing table. Row numbers continue across pages.
pub fn table(page: &Page<Category>, is_loading: bool) -> TableView {
    let offset = page.from.unwrap_or(0);
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(idx, category)| Row {
            id: category.id.get(),
            name: category.name.as_str().to_string(),
            cells: vec![
                Cell::Text {
                    value: (offset + idx).to_string(),
                    muted: None,
                },
                Cell::Text {
                    value: category.name.as_str().to_string(),
                    muted: Some(
                        category
                            .description
                            .clone()
                            .unwrap_or_else(|| "Tidak ada deskripsi".to_string()),
                    ),
                },
                status_badge(category.is_active),
                Cell::Timestamp {
                    date: format_date(&category.created_at),
                    time: format_time(&category.created_at),
                },
                Cell::Timestamp {
                    date: format_date(&category.updated_at),
                    time: format_time(&category.updated_at),
                },
            ],
            is_active: category.is_active,
            deleted: category.is_deleted(),
        })
        .collect();
    TableView::new(columns(), page, rows, is_loading)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::types::{CategoryId, CategoryName};
    use crate::dto::table::Tone;

    fn category(id: i32, name: &str, description: Option<&str>, is_active: bool) -> Category {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 0).unwrap();
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name.to_string()).unwrap(),
            description: description.map(str::to_string),
            is_active,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn row_numbers_continue_across_pages() {
        let page = Page::new(vec![category(21, "Minuman", None, true)], 3, 8, 17);
        let view = table(&page, false);
        assert_eq!(
            view.rows[0].cells[0],
            Cell::Text {
                value: "17".to_string(),
                muted: None
            }
        );
    }

    #[test]
    fn missing_description_falls_back_to_placeholder() {
        let page = Page::new(vec![category(1, "Makanan", None, true)], 1, 8, 1);
        let view = table(&page, false);
        assert_eq!(
            view.rows[0].cells[1],
            Cell::Text {
                value: "Makanan".to_string(),
                muted: Some("Tidak ada deskripsi".to_string())
            }
        );
    }

    #[test]
    fn inactive_category_gets_a_destructive_badge() {
        let page = Page::new(vec![category(1, "Arsip", Some("lama"), false)], 1, 8, 1);
        let view = table(&page, false);
        assert_eq!(
            view.rows[0].cells[2],
            Cell::Badge {
                value: "Tidak Aktif".to_string(),
                tone: Tone::Danger
            }
        );
        assert!(!view.rows[0].is_active);
    }

    #[test]
    fn dto_formats_timestamps_for_the_detail_dialog() {
        let dto = CategoryDto::from(&category(1, "Makanan", Some("Berbagai makanan"), true));
        assert_eq!(dto.created_at, "07/03/2024 14:30");
        assert_eq!(dto.description, "Berbagai makanan");
    }
}
