//! In-memory completion client for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::error::LLMError;
use super::provider::CompletionClient;
use super::types::{ChatRequest, ChatResponse, Choice, Message, Usage};

enum Reply {
    Text(String),
    NoChoices,
    RateLimited,
    Stalled(Duration),
}

/// Returns a canned outcome and records every request it receives.
pub struct StubClient {
    reply: Reply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubClient {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn without_choices() -> Self {
        Self::with(Reply::NoChoices)
    }

    pub fn rate_limited() -> Self {
        Self::with(Reply::RateLimited)
    }

    /// Never answers before `delay` has passed.
    pub fn stalled(delay: Duration) -> Self {
        Self::with(Reply::Stalled(delay))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        self.requests.lock().unwrap().push(request);
        let choices = match &self.reply {
            Reply::Text(text) => vec![Choice {
                index: 0,
                message: Message::new("assistant", text.clone()),
                finish_reason: Some("stop".to_string()),
            }],
            Reply::NoChoices => Vec::new(),
            Reply::RateLimited => return Err(LLMError::RateLimit { retry_after: None }),
            Reply::Stalled(delay) => {
                tokio::time::sleep(*delay).await;
                Vec::new()
            }
        };
        Ok(ChatResponse {
            id: "chatcmpl-stub".to_string(),
            choices,
            usage: Some(Usage {
                prompt_tokens: 1,
                completion_tokens: 1,
                total_tokens: 2,
            }),
        })
    }
}
