use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::Response,
};

use crate::middleware::auth::SESSION_HEADER;

/// Verbs the server answers
pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";

/// Stamp the origin header onto any response.
pub fn allow_origin(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

/// Empty 200 answering a preflight request.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    allow_origin(headers);
    headers.append(VARY, HeaderValue::from_static("Origin"));
    headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Method"));
    headers.append(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers());
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

fn allowed_headers() -> HeaderValue {
    let value = format!("Content-Type, Origin, Accept, {}", SESSION_HEADER);
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("Content-Type, Origin, Accept"))
}
