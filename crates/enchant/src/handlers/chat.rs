//! Chat relay HTTP handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::llm::Message;
use crate::response;
use crate::server::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatBody {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatReply {
    pub response: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return response::error(rejection.status(), rejection.body_text());
        }
    };

    match state.relay.relay(req.messages).await {
        Ok(text) => (StatusCode::OK, Json(ChatReply { response: text })).into_response(),
        Err(e) => e.into_response(),
    }
}
