use clap::Parser;
use media_ingest::SegmentLimits;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("OPENAI_API_KEY is not set - the service cannot reach the transcription/generation API")]
	MissingCredential,

	#[error("invalid configuration: {0}")]
	InvalidValue(&'static str),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ata-server")]
#[command(about = "Video-to-minutes summarization service for câmara sessions", long_about = None)]
pub struct Config {
	/// Server host
	#[arg(long, env = "HOST", default_value = "0.0.0.0")]
	pub host: String,

	/// Server port
	#[arg(long, env = "PORT", default_value = "8000")]
	pub port: u16,

	/// Credential for the hosted transcription/generation API
	#[arg(long, env = "OPENAI_API_KEY")]
	pub openai_api_key: Option<String>,

	/// Base URL for the hosted model API
	#[arg(long, env = "OPENAI_BASE_URL", default_value = sdk::DEFAULT_API_BASE_URL)]
	pub openai_base_url: String,

	/// Speech-to-text model
	#[arg(long, env = "TRANSCRIPTION_MODEL", default_value = "whisper-1")]
	pub transcription_model: String,

	/// Text-generation model for summaries
	#[arg(long, env = "SUMMARY_MODEL", default_value = "gpt-4o")]
	pub summary_model: String,

	/// Language hint forwarded with every transcription request
	#[arg(long, env = "TRANSCRIPTION_LANGUAGE", default_value = "pt")]
	pub language: String,

	/// Working directory for per-job audio downloads
	#[arg(long, env = "WORK_DIR", default_value = "/tmp/ata-server")]
	pub work_dir: PathBuf,

	/// Maximum downloaded audio size in bytes
	#[arg(long, env = "MAX_DOWNLOAD_BYTES", default_value = "536870912")]
	pub max_download_bytes: u64,

	/// Maximum segment duration in seconds (transcription API cuts off near 1400s)
	#[arg(long, env = "MAX_SEGMENT_SECS", default_value = "1390")]
	pub max_segment_secs: u64,

	/// Maximum segment upload size in bytes (transcription API ceiling)
	#[arg(long, env = "MAX_SEGMENT_BYTES", default_value = "26214400")]
	pub max_segment_bytes: u64,

	/// Words per summarization chunk
	#[arg(long, env = "CHUNK_WORDS", default_value = "2000")]
	pub chunk_words: usize,

	/// Sampling temperature for summarization requests
	#[arg(long, env = "SUMMARY_TEMPERATURE", default_value = "0.3")]
	pub summary_temperature: f32,

	/// Timeout for each external API call in seconds
	#[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "300")]
	pub request_timeout_secs: u64,

	/// Attempts per external API call (1 disables retry)
	#[arg(long, env = "API_RETRY_ATTEMPTS", default_value = "3")]
	pub api_retry_attempts: usize,

	/// Comma-separated CORS origin allow-list ("*" allows any origin)
	#[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
	pub allowed_origins: String,

	/// Maximum request body size in KB
	#[arg(long, env = "MAX_REQUEST_SIZE", default_value = "64")]
	pub max_request_size: usize,

	/// Request timeout for HTTP handlers in milliseconds
	#[arg(long, env = "TASK_TIMEOUT_MS", default_value = "10000")]
	pub task_timeout_ms: u64,

	/// Use JSON formatting for tracing
	#[arg(long, env = "LOG_JSON", default_value = "false")]
	pub log_json: bool,

	/// Log level
	#[arg(long, env = "RUST_LOG")]
	pub rust_log: Option<String>,
}

impl Config {
	/// Validate configuration values. A missing credential is fatal - the
	/// process must not start without it.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.credential()?;

		if self.chunk_words == 0 {
			return Err(ConfigError::InvalidValue("chunk_words must be at least 1"));
		}

		if self.max_segment_secs == 0 {
			return Err(ConfigError::InvalidValue("max_segment_secs must be at least 1"));
		}

		if self.max_segment_bytes < 1024 {
			return Err(ConfigError::InvalidValue("max_segment_bytes must be at least 1024"));
		}

		if self.api_retry_attempts == 0 {
			return Err(ConfigError::InvalidValue("api_retry_attempts must be at least 1"));
		}

		if !(0.0..=2.0).contains(&self.summary_temperature) {
			return Err(ConfigError::InvalidValue("summary_temperature must be between 0.0 and 2.0"));
		}

		Ok(())
	}

	pub fn credential(&self) -> Result<&str, ConfigError> {
		match self.openai_api_key.as_deref() {
			Some(key) if !key.trim().is_empty() => Ok(key),
			_ => Err(ConfigError::MissingCredential),
		}
	}

	pub fn segment_limits(&self) -> SegmentLimits {
		SegmentLimits {
			max_segment_secs: self.max_segment_secs,
			max_segment_bytes: self.max_segment_bytes,
		}
	}
}
