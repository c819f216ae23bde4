use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The operator is not signed in or the backend rejected the session token.
    #[error("unauthorized")]
    Unauthorized,
    /// The operator lacks the role required for the operation.
    #[error("forbidden")]
    Forbidden,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The request was abandoned in favor of a newer one.
    #[error("cancelled")]
    Cancelled,
    /// A form or the backend rejected the submitted data.
    #[error("{0}")]
    Form(String),
    /// The backend could not be reached.
    #[error("network error")]
    Network,
    /// The backend failed while handling the request.
    #[error("server error")]
    Server,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
