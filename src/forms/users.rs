use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, TypeConstraintError, UserName, UserRole};
use crate::domain::user::{NewUser, UserUpdate};
use crate::forms::{FormIssue, first_issue, issue_from_type_constraint};

#[derive(Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    /// Checkboxes are absent from the form body when unchecked.
    #[serde(default)]
    pub is_active: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddUserFormPayload {
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub password: String,
}

impl AddUserFormPayload {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            role: self.role,
            is_active: self.is_active,
            password: self.password,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddUserFormError {
    #[error("Add user form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Add user form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for AddUserFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl AddUserFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<AddUserForm> for AddUserFormPayload {
    type Error = AddUserFormError;

    fn try_from(value: AddUserForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: UserName::new(value.name)?,
            email: Email::new(value.email)?,
            role: UserRole::try_from(value.role)?,
            is_active: value.is_active.is_some(),
            password: value.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateUserForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_active: Option<String>,
    /// Left empty to keep the current password.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUserFormPayload {
    pub name: UserName,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub password: Option<String>,
}

impl UpdateUserFormPayload {
    pub fn into_update(self) -> UserUpdate {
        UserUpdate {
            name: self.name,
            email: self.email,
            role: self.role,
            is_active: self.is_active,
            password: self.password,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateUserFormError {
    #[error("Update user form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Update user form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for UpdateUserFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl UpdateUserFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<UpdateUserForm> for UpdateUserFormPayload {
    type Error = UpdateUserFormError;

    fn try_from(value: UpdateUserForm) -> Result<Self, Self::Error> {
        value.validate()?;

        // The password checks cannot live on the derive because the field
        // is optional on update.
        let password = if value.password.is_empty() {
            None
        } else {
            if value.password.len() < 8 {
                return Err(UpdateUserFormError::Validation(FormIssue::TooShort {
                    field: "Password",
                    min: 8,
                }));
            }
            if value.password != value.password_confirmation {
                return Err(UpdateUserFormError::Validation(FormIssue::Mismatch {
                    field: "Konfirmasi Password",
                }));
            }
            Some(value.password)
        };

        Ok(Self {
            name: UserName::new(value.name)?,
            email: Email::new(value.email)?,
            role: UserRole::try_from(value.role)?,
            is_active: value.is_active.is_some(),
            password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateUserRoleForm {
    #[validate(length(min = 1))]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUserRoleFormPayload {
    pub role: UserRole,
}

#[derive(Debug, Error)]
pub enum UpdateUserRoleFormError {
    #[error("Update user role form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Update user role form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for UpdateUserRoleFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl UpdateUserRoleFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<UpdateUserRoleForm> for UpdateUserRoleFormPayload {
    type Error = UpdateUserRoleFormError;

    fn try_from(value: UpdateUserRoleForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            role: UserRole::try_from(value.role)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddUserForm {
        AddUserForm {
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            role: "admin".to_string(),
            is_active: Some("on".to_string()),
            password: "rahasia-123".to_string(),
            password_confirmation: "rahasia-123".to_string(),
        }
    }

    #[test]
    fn add_user_form_builds_new_user() {
        let payload: AddUserFormPayload = add_form().try_into().unwrap();
        let new_user = payload.into_new_user();
        assert_eq!(new_user.name, "Budi Santoso");
        assert_eq!(new_user.role, UserRole::Admin);
        assert!(new_user.is_active);
    }

    #[test]
    fn add_user_form_rejects_unknown_role() {
        let mut form = add_form();
        form.role = "superuser".to_string();
        let err = AddUserFormPayload::try_from(form).unwrap_err();
        assert!(matches!(err.issue(), FormIssue::Other(_)));
    }

    #[test]
    fn update_without_password_keeps_current_one() {
        let form = UpdateUserForm {
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            role: "user".to_string(),
            is_active: None,
            password: String::new(),
            password_confirmation: String::new(),
        };

        let payload: UpdateUserFormPayload = form.try_into().unwrap();
        assert_eq!(payload.password, None);
        assert!(!payload.is_active);
    }

    #[test]
    fn update_with_short_password_is_rejected() {
        let form = UpdateUserForm {
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            role: "user".to_string(),
            is_active: None,
            password: "short".to_string(),
            password_confirmation: "short".to_string(),
        };

        let err = UpdateUserFormPayload::try_from(form).unwrap_err();
        assert_eq!(
            err.issue(),
            FormIssue::TooShort {
                field: "Password",
                min: 8
            }
        );
    }

    #[test]
    fn update_with_mismatched_confirmation_is_rejected() {
        let form = UpdateUserForm {
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            role: "user".to_string(),
            is_active: None,
            password: "rahasia-123".to_string(),
            password_confirmation: "rahasia-456".to_string(),
        };

        let err = UpdateUserFormPayload::try_from(form).unwrap_err();
        assert_eq!(
            err.issue(),
            FormIssue::Mismatch {
                field: "Konfirmasi Password"
            }
        );
    }

    #[test]
    fn role_form_parses_role() {
        let form = UpdateUserRoleForm {
            role: "admin".to_string(),
        };
        let payload: UpdateUserRoleFormPayload = form.try_into().unwrap();
        assert_eq!(payload.role, UserRole::Admin);
    }
}
