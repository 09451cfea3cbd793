//! Lazily constructed, shared completion client.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};

use super::error::LLMError;
use super::openai::OpenAICompatibleClient;
use super::provider::CompletionClient;
use crate::config::Settings;

/// Builds a fresh client. Called until it first succeeds.
pub type ClientFactory =
    Box<dyn Fn() -> Result<Arc<dyn CompletionClient>, LLMError> + Send + Sync>;

/// Owns the single completion client for the process.
///
/// The client is built on the first call to [`ClientAccessor::get_client`] and
/// reused by every later call. Concurrent first calls wait on one construction.
/// A failed construction leaves the cell empty so the next caller retries.
pub struct ClientAccessor {
    cell: OnceCell<Arc<dyn CompletionClient>>,
    factory: ClientFactory,
}

impl ClientAccessor {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            cell: OnceCell::new(),
            factory,
        }
    }

    /// Accessor that builds an [`OpenAICompatibleClient`] from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let api_base = settings.api_base.clone();
        let api_key = settings.api_key.clone();
        Self::new(Box::new(move || {
            let client = OpenAICompatibleClient::new(&api_base, &api_key)?;
            Ok(Arc::new(client) as Arc<dyn CompletionClient>)
        }))
    }

    /// Get the shared client, constructing it on first use.
    pub async fn get_client(&self) -> Result<Arc<dyn CompletionClient>, LLMError> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                match (self.factory)() {
                    Ok(client) => {
                        info!("API client initialized");
                        Ok(client)
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to initialize API client");
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Whether the client has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
