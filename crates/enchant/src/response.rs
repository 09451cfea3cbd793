//! Uniform error responses.
//!
//! Every failure the service reports has the shape `{"detail": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::relay::RelayError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub fn error(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
        .into_response()
}

pub fn bad_request(detail: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, detail)
}

pub fn internal_error(detail: impl Into<String>) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, detail)
}

/// Give the bare 408 produced by the timeout layer a `detail` body.
pub async fn timeout_detail(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return error(StatusCode::REQUEST_TIMEOUT, "Request Timeout");
    }
    response
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if self.is_bad_request() {
            bad_request(self.to_string())
        } else {
            internal_error(self.to_string())
        }
    }
}
