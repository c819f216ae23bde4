//! HTML form definitions and their conversions into validated payloads.

use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod categories;
pub mod users;

/// Normalized reason a form was rejected.
///
/// Carries the operator-facing field label so the alert layer can show which
/// input to fix without re-parsing validation messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIssue {
    Required { field: &'static str },
    Invalid { field: &'static str },
    TooShort { field: &'static str, min: usize },
    TooLong { field: &'static str, max: usize },
    Mismatch { field: &'static str },
    Other(String),
}

impl std::fmt::Display for FormIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { field } => write!(f, "missing required field: {field}"),
            Self::Invalid { field } => write!(f, "invalid value for field: {field}"),
            Self::TooShort { field, min } => {
                write!(f, "field {field} is shorter than {min} characters")
            }
            Self::TooLong { field, max } => {
                write!(f, "field {field} is longer than {max} characters")
            }
            Self::Mismatch { field } => write!(f, "field {field} does not match"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

/// Operator-facing label for a form field or constraint name.
fn label(field: &str) -> &'static str {
    match field {
        "name" | "category name" | "user name" => "Nama",
        "email" => "Email",
        "password" => "Password",
        "password_confirmation" => "Konfirmasi Password",
        "role" | "user role" => "Role",
        "description" => "Deskripsi",
        _ => "Input",
    }
}

/// Picks the first field error out of a `validator` report.
fn first_issue(errors: &ValidationErrors) -> FormIssue {
    for (field, kind) in errors.errors() {
        let ValidationErrorsKind::Field(field_errors) = kind else {
            continue;
        };
        let Some(error) = field_errors.first() else {
            continue;
        };
        let field = label(field.as_ref());
        return match error.code.as_ref() {
            "length" => {
                let min = error.params.get("min").and_then(|v| v.as_u64());
                let max = error.params.get("max").and_then(|v| v.as_u64());
                match (min, max) {
                    (Some(1), _) => FormIssue::Required { field },
                    (Some(min), _) => FormIssue::TooShort {
                        field,
                        min: min as usize,
                    },
                    (None, Some(max)) => FormIssue::TooLong {
                        field,
                        max: max as usize,
                    },
                    (None, None) => FormIssue::Invalid { field },
                }
            }
            "email" => FormIssue::Invalid { field },
            "must_match" => FormIssue::Mismatch { field },
            _ => FormIssue::Invalid { field },
        };
    }
    FormIssue::Other("form validation failed".to_string())
}

fn issue_from_type_constraint(error: &TypeConstraintError) -> FormIssue {
    match error {
        TypeConstraintError::EmptyString(field) => FormIssue::Required {
            field: label(field),
        },
        TypeConstraintError::InvalidEmail(field) => FormIssue::Invalid {
            field: label(field),
        },
        TypeConstraintError::NonPositiveId(field) => FormIssue::Invalid {
            field: label(field),
        },
        TypeConstraintError::InvalidValue(message) => FormIssue::Other(message.clone()),
    }
}
