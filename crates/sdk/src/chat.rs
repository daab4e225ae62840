use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
	#[error("chat completion request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("chat completion API returned {status}: {body}")]
	Api { status: u16, body: String },

	#[error("chat completion API returned no choices")]
	EmptyResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}

impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self {
			role: "system".to_string(),
			content: content.into(),
		}
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self {
			role: "user".to_string(),
			content: content.into(),
		}
	}
}

#[derive(Serialize)]
struct ChatRequest<'a> {
	model: &'a str,
	messages: &'a [ChatMessage],
	temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
	choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
	message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
	content: String,
}

/// Client for the hosted chat-completion endpoint (`/chat/completions`).
pub struct ChatClient {
	client: reqwest::Client,
	base_url: String,
	api_key: String,
	model: String,
}

impl ChatClient {
	pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
		Self {
			client,
			base_url: base_url.into(),
			api_key: api_key.into(),
			model: model.into(),
		}
	}

	/// Send one message list and return the first choice's content.
	pub async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, ChatError> {
		let request = ChatRequest {
			model: &self.model,
			messages,
			temperature,
		};

		let response = self
			.client
			.post(format!("{}/chat/completions", self.base_url))
			.bearer_auth(&self.api_key)
			.json(&request)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ChatError::Api { status: status.as_u16(), body });
		}

		let parsed: ChatResponse = response.json().await?;

		parsed.choices.into_iter().next().map(|choice| choice.message.content).ok_or(ChatError::EmptyResponse)
	}
}
