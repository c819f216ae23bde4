use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::auth::{Credentials, Registration};
use crate::domain::types::{Email, TypeConstraintError, UserName};
use crate::forms::{FormIssue, first_issue, issue_from_type_constraint};

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub email: Email,
    pub password: String,
}

impl LoginFormPayload {
    pub fn into_credentials(self) -> Credentials {
        Credentials {
            email: self.email.into_inner(),
            password: self.password,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Login form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl LoginFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub name: UserName,
    pub email: Email,
    pub password: String,
}

impl RegisterFormPayload {
    pub fn into_registration(self) -> Registration {
        let password_confirmation = self.password.clone();
        Registration {
            name: self.name.into_inner(),
            email: self.email.into_inner(),
            password: self.password,
            password_confirmation,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterFormError {
    #[error("Register form validation failed: {0}")]
    Validation(FormIssue),
    #[error("Register form contains invalid data: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

impl From<ValidationErrors> for RegisterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(first_issue(&value))
    }
}

impl RegisterFormError {
    pub fn issue(&self) -> FormIssue {
        match self {
            Self::Validation(issue) => issue.clone(),
            Self::TypeConstraint(error) => issue_from_type_constraint(error),
        }
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = RegisterFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: UserName::new(value.name)?,
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}
