use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
	#[error("transcription request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("transcription API returned {status}: {body}")]
	Api { status: u16, body: String },

	#[error("transcription API returned an empty transcript")]
	EmptyTranscript,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
	text: String,
}

/// Client for the hosted speech-to-text endpoint (`/audio/transcriptions`).
///
/// One segment in, one transcript string out. The caller owns ordering.
pub struct SpeechClient {
	client: reqwest::Client,
	base_url: String,
	api_key: String,
	model: String,
}

impl SpeechClient {
	pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
		Self {
			client,
			base_url: base_url.into(),
			api_key: api_key.into(),
			model: model.into(),
		}
	}

	/// Upload one audio segment and return its transcript.
	///
	/// `language` is an ISO 639-1 hint passed straight through to the API.
	pub async fn transcribe(&self, audio: Vec<u8>, file_name: &str, language: &str) -> Result<String, SpeechError> {
		let audio_len = audio.len();

		let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string()).mime_str("audio/wav")?;
		let form = reqwest::multipart::Form::new()
			.part("file", part)
			.text("model", self.model.clone())
			.text("language", language.to_string());

		tracing::debug!(file_name, audio_len, "uploading segment for transcription");

		let response = self
			.client
			.post(format!("{}/audio/transcriptions", self.base_url))
			.bearer_auth(&self.api_key)
			.multipart(form)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(SpeechError::Api { status: status.as_u16(), body });
		}

		let parsed: TranscriptionResponse = response.json().await?;
		if parsed.text.trim().is_empty() {
			return Err(SpeechError::EmptyTranscript);
		}

		Ok(parsed.text)
	}
}
