use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Route-tier error type.
///
/// These surface as plain-text bodies with coarse HTTP status codes. History
/// fetch failures never pass through here: `/history` reports them inside a
/// 200 JSON body via the `s` status field.
#[derive(Debug)]
pub enum FeedError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "not_found: {msg}"),
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, body).into_response()
    }
}
