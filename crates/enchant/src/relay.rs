//! Chat relay: validates a conversation and forwards it to the completion API.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CompletionConfig;
use crate::llm::{ChatRequest, ClientAccessor, LLMError, Message};

/// Why a relay attempt failed.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request carried no messages.
    #[error("messages must not be empty")]
    EmptyConversation,

    /// The completion client could not be built.
    #[error("failed to initialize API client: {0}")]
    ClientInit(#[source] LLMError),

    /// The upstream answered successfully but without any choice.
    #[error("completion returned no choices")]
    NoChoices,

    /// The upstream call failed.
    #[error(transparent)]
    Upstream(LLMError),
}

impl RelayError {
    /// True when the caller sent something unusable, as opposed to a server-side failure.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, RelayError::EmptyConversation)
    }
}

/// Forwards conversations to the shared completion client.
pub struct ChatRelay {
    accessor: Arc<ClientAccessor>,
    completion: CompletionConfig,
}

impl ChatRelay {
    pub fn new(accessor: Arc<ClientAccessor>, completion: CompletionConfig) -> Self {
        Self {
            accessor,
            completion,
        }
    }

    /// Send `messages` upstream and return the first choice's text.
    ///
    /// The messages are forwarded unchanged and in order. Nothing is retried.
    pub async fn relay(&self, messages: Vec<Message>) -> Result<String, RelayError> {
        let Some(last) = messages.last() else {
            return Err(RelayError::EmptyConversation);
        };
        debug!(
            messages = messages.len(),
            last_role = %last.role,
            last_len = last.content.len(),
            "Relaying conversation"
        );

        let client = self
            .accessor
            .get_client()
            .await
            .map_err(RelayError::ClientInit)?;

        let request = ChatRequest {
            model: self.completion.model.clone(),
            messages,
            temperature: Some(self.completion.temperature),
            max_tokens: Some(self.completion.max_tokens),
        };

        let response = client.chat(request).await.map_err(|e| {
            warn!(error = %e, "Completion request failed");
            RelayError::Upstream(e)
        })?;

        if let Some(usage) = &response.usage {
            debug!(
                id = %response.id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion received"
            );
        }

        let Some(content) = response.first_content() else {
            warn!(id = %response.id, "Completion returned no choices");
            return Err(RelayError::NoChoices);
        };

        Ok(content.to_string())
    }
}
