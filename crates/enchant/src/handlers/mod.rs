//! HTTP request handlers.

mod chat;
mod fallback;
mod health;

pub use chat::{ChatBody, ChatReply, chat};
pub use fallback::{method_not_allowed, not_found};
pub use health::{GREETING, livez, readyz, root};
