use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

pub const GREETING: &str = "Hello from DeepSeek Enchant";

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": GREETING }))
}

pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

pub async fn readyz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
