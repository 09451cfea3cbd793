//! LLM client for chat completions.

mod accessor;
mod error;
mod openai;
mod provider;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use accessor::{ClientAccessor, ClientFactory};
pub use error::LLMError;
pub use openai::OpenAICompatibleClient;
pub use provider::CompletionClient;
pub use types::{ChatRequest, ChatResponse, Choice, Message, Usage};
