use axum::http::StatusCode;
use axum::response::Response;

use crate::response;

/// Any path without a route.
pub async fn not_found() -> Response {
    response::error(StatusCode::NOT_FOUND, "Not Found")
}

/// A known path hit with the wrong method.
pub async fn method_not_allowed() -> Response {
    response::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
