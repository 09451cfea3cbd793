//! Completion client trait.

use async_trait::async_trait;

use super::error::LLMError;
use super::types::{ChatRequest, ChatResponse};

/// A handle to a remote chat-completion API.
///
/// Implementations are shared across requests, so they must be cheap to call
/// concurrently through an `Arc`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Make a chat completion request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError>;
}
