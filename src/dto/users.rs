use serde::Serialize;

use crate::domain::auth::SessionUser;
use crate::domain::page::Page;
use crate::domain::types::UserRole;
use crate::domain::user::User;
use crate::dto::table::{Cell, Column, Row, TableView, Tone, format_date, format_time, status_badge};

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Admin",
        UserRole::User => "User",
    }
}

/// User projected for templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Wire value, `admin` or `user`. Preselects the role dropdown.
    pub role: String,
    pub role_label: String,
    pub is_active: bool,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserDto {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            email: value.email.as_str().to_string(),
            role: value.role.as_str().to_string(),
            role_label: role_label(value.role).to_string(),
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

/// Operator identity for the header card. The access token stays out of
/// every render context on purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDto {
    pub name: String,
    pub email: String,
    pub role: String,
    pub role_label: String,
    /// Uppercased first letter of the name, shown as the avatar.
    pub initial: String,
    pub is_admin: bool,
}

impl From<&SessionUser> for ProfileDto {
    fn from(value: &SessionUser) -> Self {
        Self {
            name: value.name.clone(),
            email: value.email.clone(),
            role: value.role.as_str().to_string(),
            role_label: role_label(value.role).to_string(),
            initial: value
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default(),
            is_admin: value.is_admin(),
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("No"),
        Column::new("User"),
        Column::new("Role"),
        Column::new("Status"),
        Column::new("Dibuat"),
        Column::new("Terakhir Update"),
    ]
}

fn role_badge(role: UserRole) -> Cell {
    Cell::Badge {
        value: role_label(role).to_string(),
        tone: match role {
            UserRole::Admin => Tone::Info,
            UserRole::User => Tone::Muted,
        },
    }
}

/// Builds the user listing table.
pub fn table(page: &Page<User>, is_loading: bool) -> TableView {
    let offset = page.from.unwrap_or(0);
    let rows = page
        .items
        .iter()
        .enumerate()
        .map(|(idx, user)| Row {
            id: user.id.get(),
            name: user.name.as_str().to_string(),
            cells: vec![
                Cell::Text {
                    value: (offset + idx).to_string(),
                    muted: None,
                },
                Cell::Text {
                    value: user.name.as_str().to_string(),
                    muted: Some(user.email.as_str().to_string()),
                },
                role_badge(user.role),
                status_badge(user.is_active),
                Cell::Timestamp {
                    date: format_date(&user.created_at),
                    time: format_time(&user.created_at),
                },
                Cell::Timestamp {
                    date: format_date(&user.updated_at),
                    time: format_time(&user.updated_at),
                },
            ],
            is_active: user.is_active,
            deleted: user.is_deleted(),
        })
        .collect();
    TableView::new(columns(), page, rows, is_loading)
}
