use axum::http::StatusCode;

use crate::authorization::policy::DenyReason;
use crate::data_access::data_context::StoreError;

/// Error taxonomy shared by every service operation. Validation and
/// conflict checks run before any mutation, so an Err means nothing was
/// written.
#[derive(Debug)]
pub enum ServiceError {
    /// Missing or malformed input; the message says what to fix.
    Validation(String),
    /// Id does not resolve to a live, non-deleted record.
    NotFound(&'static str),
    /// Authenticated but not allowed. Deliberately carries no detail.
    AccessDenied,
    /// A business rule blocks the operation.
    Conflict(String),
    /// Infrastructure failure. Detail goes to the log, not to the caller.
    Unexpected(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Unexpected(e.to_string())
    }
}

impl From<DenyReason> for ServiceError {
    fn from(_: DenyReason) -> Self {
        ServiceError::AccessDenied
    }
}

impl ServiceError {
    /// Map to the (status, body) tuple handlers return. Access-denied and
    /// unexpected errors render fixed bodies; the latter is logged in full.
    pub fn into_http(self) -> (StatusCode, String) {
        match self {
            ServiceError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ServiceError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ServiceError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            ServiceError::Conflict(message) => (StatusCode::CONFLICT, message),
            ServiceError::Unexpected(detail) => {
                tracing::error!("unexpected failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Validation(m) => write!(f, "validation: {m}"),
            ServiceError::NotFound(what) => write!(f, "{what} not found"),
            ServiceError::AccessDenied => write!(f, "access denied"),
            ServiceError::Conflict(m) => write!(f, "conflict: {m}"),
            ServiceError::Unexpected(m) => write!(f, "unexpected: {m}"),
        }
    }
}
