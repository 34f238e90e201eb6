//! Error types for routing and route handlers

use thiserror::Error;

/// Errors raised while building a route table.
///
/// Both variants are fatal: the route table is left unchanged and the caller
/// is expected to abort setup rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The pattern could not be turned into a matcher.
    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A route with the same name is already registered.
    #[error("{0} already exists")]
    DuplicateRoute(String),
}

/// Errors that can occur in a handler
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::Unavailable(_) => 503,
            HandlerError::Serialization(_) | HandlerError::Internal(_) => 500,
        }
    }

    /// Convert to a Response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::json(
            self.status_code(),
            serde_json::json!({
                "error": self.to_string()
            }),
        )
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}

/// Result type returned by route handlers
pub type HandlerResult = Result<crate::Response, HandlerError>;
