// HTTP API Error Types
use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::SessionError;
use crate::database::DatabaseError;

/// Client-signalled failure: a stable machine-readable code with the HTTP
/// status it always travels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerError {
    code: &'static str,
    status: StatusCode,
}

impl HandlerError {
    pub const fn new(code: &'static str, status: StatusCode) -> Self {
        Self { code, status }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

// System codes
pub const INVALID_PARAMS: HandlerError = HandlerError::new("sys_invalid_params", StatusCode::BAD_REQUEST);
pub const ROUTE_NOT_FOUND: HandlerError = HandlerError::new("sys_route_not_found", StatusCode::NOT_FOUND);
pub const METHOD_NOT_ALLOWED: HandlerError =
    HandlerError::new("sys_method_not_allowed", StatusCode::METHOD_NOT_ALLOWED);

// User codes
pub const LOGIN_INVALID: HandlerError = HandlerError::new("user_login_invalid", StatusCode::UNAUTHORIZED);
pub const USER_DATA_INVALID: HandlerError = HandlerError::new("user_data_invalid", StatusCode::BAD_REQUEST);
pub const SESSION_INVALID: HandlerError = HandlerError::new("user_session_invalid", StatusCode::UNAUTHORIZED);
pub const EMAIL_USED: HandlerError = HandlerError::new("user_email_used", StatusCode::CONFLICT);

// Vault codes
pub const CONTAINER_NOT_FOUND: HandlerError = HandlerError::new("container_not_found", StatusCode::NOT_FOUND);
pub const CONTAINER_EXISTS: HandlerError = HandlerError::new("container_exists", StatusCode::CONFLICT);
pub const STORE_NOT_FOUND: HandlerError = HandlerError::new("store_not_found", StatusCode::NOT_FOUND);

/// Every failure a handler or middleware can report.
///
/// The router classifies these exhaustively when writing the envelope:
/// `Handler` keeps its own status, `Generic` becomes 400 from a handler and
/// 500 from middleware, `Internal` is always 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Handler(HandlerError),

    #[error("{0}")]
    Generic(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn generic(message: impl Into<String>) -> Self {
        ApiError::Generic(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Map a write failure, reporting a uniqueness conflict as `code`.
    pub fn conflict_as(code: HandlerError) -> impl FnOnce(DatabaseError) -> ApiError {
        move |err| match err {
            DatabaseError::Conflict => ApiError::Handler(code),
            err => err.into(),
        }
    }

    /// Status written for this error; `generic_status` applies to `Generic` only.
    pub fn status_code(&self, generic_status: StatusCode) -> StatusCode {
        match self {
            ApiError::Handler(err) => err.status(),
            ApiError::Generic(_) => generic_status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HandlerError> for ApiError {
    fn from(err: HandlerError) -> Self {
        ApiError::Handler(err)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // Don't expose internal SQL errors to clients
        tracing::error!("Database error: {}", err);
        ApiError::internal("Database error occurred")
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Session error: {}", err);
        ApiError::internal("Unable to create session")
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal("Unable to process credentials")
    }
}
