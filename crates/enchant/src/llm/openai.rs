//! OpenAI-compatible completion client.
//!
//! Works with DeepSeek, OpenAI, OpenRouter, and other compatible APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::error::{LLMError, check_response_error};
use super::provider::CompletionClient;
use super::types::{ChatRequest, ChatResponse};

/// OpenAI-compatible client with the bearer token baked into its default headers.
#[derive(Debug)]
pub struct OpenAICompatibleClient {
    client: Client,
    base_url: String,
}

impl OpenAICompatibleClient {
    /// Build a client for `base_url` authenticated with `api_key`.
    ///
    /// Fails eagerly on a malformed URL or a key that cannot be sent as a header.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, LLMError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| LLMError::InvalidConfig(format!("invalid api base '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LLMError::InvalidConfig(format!(
                "unsupported api base scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            LLMError::InvalidConfig("api key contains characters not allowed in a header".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(LLMError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LLMError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self.client.post(&url).json(&request).send().await?;

        if let Some(err) = check_response_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LLMError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}
