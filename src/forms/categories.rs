use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{CategoryUpdate, NewCategory};
use crate::domain::types::{CategoryName, TypeConstraintError};
use crate::forms::{FormIssue, first_issue, issue_from_type_constraint};

fn normalize_description(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Checkboxes are absent from the form body when unchecked.
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    pub description: Option<String>,
    pub is_active: bool,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name,
            description: self.description,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddCategoryFormError {
    #[error("Add category form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Add category form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for AddCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl AddCategoryFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = AddCategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            description: normalize_description(value.description),
            is_active: value.is_active.is_some(),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub name: CategoryName,
    pub description: Option<String>,
    pub is_active: bool,
}

impl UpdateCategoryFormPayload {
    pub fn into_update(self) -> CategoryUpdate {
        CategoryUpdate {
            name: self.name,
            description: self.description,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateCategoryFormError {
    #[error("Update category form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Update category form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for UpdateCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl UpdateCategoryFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryFormPayload {
    type Error = UpdateCategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
            description: normalize_description(value.description),
            is_active: value.is_active.is_some(),
        })
    }
}
