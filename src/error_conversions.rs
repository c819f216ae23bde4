//! Error conversion glue between the transport layers and [`ServiceError`].
//!
//! The domain and api layers must not depend on service error types, so the
//! conversions live here instead of next to the individual errors.

use crate::api::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::fetch::FetchError;
use crate::services::ServiceError;

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        match val {
            ApiError::Unauthorized => ServiceError::Unauthorized,
            ApiError::NotFound => ServiceError::NotFound,
            ApiError::Validation(message) => ServiceError::Form(message),
            ApiError::Server(_) => ServiceError::Server,
            ApiError::Network(_) => ServiceError::Network,
            ApiError::Decode(_) => ServiceError::Internal,
        }
    }
}

impl From<FetchError> for ServiceError {
    fn from(val: FetchError) -> Self {
        match val {
            FetchError::Cancelled => ServiceError::Cancelled,
            FetchError::Api(e) => e.into(),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
