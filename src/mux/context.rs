use axum::body::{Body, Bytes};
use axum::http::{request::Parts, HeaderMap, Method, Request, Uri};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::database::models::User;
use crate::error::{ApiError, INVALID_PARAMS, SESSION_INVALID};

/// Per-request state handed through middleware to the handler.
///
/// Holds the request head, the buffered body and a fixed set of typed slots
/// filled by middleware. Slots are write-once: the first value attached wins.
#[derive(Debug)]
pub struct RequestContext {
    parts: Parts,
    body: Bytes,
    principal: Option<User>,
}

impl RequestContext {
    /// Buffer the body (up to `limit` bytes) and wrap the request.
    pub async fn from_request(request: Request<Body>, limit: usize) -> Result<Self, ApiError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, limit).await.map_err(|e| {
            warn!("Unable to read request body: {}", e);
            ApiError::Handler(INVALID_PARAMS)
        })?;
        Ok(Self::new(parts, body))
    }

    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self {
            parts,
            body,
            principal: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Header value as text; non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the JSON body. Any structural failure is `sys_invalid_params`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            debug!("Unable to decode {}: {}", self.parts.uri.path(), e);
            ApiError::Handler(INVALID_PARAMS)
        })
    }

    /// Attach the authenticated user. Returns `false` if one was already attached.
    pub fn attach_principal(&mut self, user: User) -> bool {
        if self.principal.is_some() {
            return false;
        }
        self.principal = Some(user);
        true
    }

    pub fn principal(&self) -> Option<&User> {
        self.principal.as_ref()
    }

    /// The authenticated user, or `user_session_invalid` when the route was
    /// not guarded by authentication.
    pub fn require_principal(&self) -> Result<&User, ApiError> {
        self.principal.as_ref().ok_or(ApiError::Handler(SESSION_INVALID))
    }
}
