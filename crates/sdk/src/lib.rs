mod chat;
mod speech;

pub use chat::{ChatClient, ChatError, ChatMessage};
pub use speech::{SpeechClient, SpeechError};

/// Default base URL for the hosted model API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
