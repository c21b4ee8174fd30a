use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, HandlerError};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Uniform response body:
/// `{status: "success", content}`, `{status: <code>}` or `{status: "error", content: <message>}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl Envelope {
    pub fn success(content: Value) -> Self {
        Self {
            status: Cow::Borrowed(STATUS_SUCCESS),
            content: Some(content),
        }
    }

    pub fn code(err: HandlerError) -> Self {
        Self {
            status: Cow::Borrowed(err.code()),
            content: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Cow::Borrowed(STATUS_ERROR),
            content: Some(Value::String(message.into())),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// 200 with the success envelope
pub fn success(content: Value) -> Response {
    Envelope::success(content).into_response(StatusCode::OK)
}

/// Write a failure. `generic_status` is used for `ApiError::Generic`:
/// 400 when a handler returned it, 500 when middleware did.
pub fn failure(err: ApiError, generic_status: StatusCode) -> Response {
    let status = err.status_code(generic_status);
    let envelope = match err {
        ApiError::Handler(code) => Envelope::code(code),
        ApiError::Generic(message) | ApiError::Internal(message) => Envelope::error(message),
    };
    envelope.into_response(status)
}
