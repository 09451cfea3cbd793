//! Enchant - a minimal chat relay in front of OpenAI-compatible completion APIs.

pub mod config;
pub mod handlers;
pub mod llm;
pub mod port;
pub mod relay;
pub mod response;
pub mod server;
