use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod registry;
pub mod routes;
pub mod summarize;
pub mod transcribe;
pub mod utils;
pub mod worker;

pub use config::{Config, ConfigError};
pub use error::AtaServerError;
pub use pipeline::{JobPipeline, PipelineError, PipelineOutput, VideoMinutesPipeline};
pub use registry::{InMemoryJobStore, Job, JobId, JobStatus, JobStore};
use sdk::{ChatClient, SpeechClient};

#[derive(Clone)]
pub struct AppState {
	pub config: Arc<Config>,
	pub jobs: Arc<dyn JobStore>,
	pub pipeline: Arc<dyn JobPipeline>,
	pub cancel_token: CancellationToken,
}

impl AppState {
	/// Build the entire universe in one explicit place.
	///
	/// Fails before the listener binds when the credential is missing.
	pub fn build(config: Arc<Config>, cancel_token: CancellationToken) -> anyhow::Result<Self> {
		config.validate()?;
		let api_key = config.credential()?.to_string();

		// One shared client with a bounded per-call timeout
		let http = reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs)).build()?;

		let speech = SpeechClient::new(http.clone(), config.openai_base_url.clone(), api_key.clone(), config.transcription_model.clone());
		let chat = ChatClient::new(http, config.openai_base_url.clone(), api_key, config.summary_model.clone());

		let pipeline = Arc::new(VideoMinutesPipeline::new(&config, speech, chat));

		Ok(Self {
			config,
			jobs: Arc::new(InMemoryJobStore::new()),
			pipeline,
			cancel_token,
		})
	}
}

impl FromRef<AppState> for Arc<Config> {
	fn from_ref(state: &AppState) -> Self {
		state.config.clone()
	}
}

impl FromRef<AppState> for Arc<dyn JobStore> {
	fn from_ref(state: &AppState) -> Self {
		state.jobs.clone()
	}
}

impl FromRef<AppState> for CancellationToken {
	fn from_ref(state: &AppState) -> Self {
		state.cancel_token.clone()
	}
}
