use crate::config::Config;
use crate::{summarize, transcribe};
use async_trait::async_trait;
use media_ingest::{acquire_audio, segment_audio, SegmentLimits};
use sdk::{ChatClient, SpeechClient};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	#[error("acquisition failed: {0}")]
	Acquire(#[from] media_ingest::AcquireError),

	#[error("segmentation failed: {0}")]
	Segment(#[from] media_ingest::SegmentError),

	#[error("transcription failed: {0}")]
	Transcribe(#[from] sdk::SpeechError),

	#[error("summarization failed: {0}")]
	Summarize(#[from] sdk::ChatError),
}

/// Everything a successful job publishes.
pub struct PipelineOutput {
	pub title: String,
	pub transcription: String,
	pub summary: String,
}

/// One job's unit of work, start to finish.
///
/// The worker and HTTP layers depend only on this trait so the job lifecycle
/// can be exercised without yt-dlp/ffmpeg or a live API.
#[async_trait]
pub trait JobPipeline: Send + Sync {
	async fn run(&self, job_id: &str, url: &str) -> Result<PipelineOutput, PipelineError>;
}

/// Production pipeline: acquire → segment → transcribe → summarize,
/// strictly sequential inside one job.
pub struct VideoMinutesPipeline {
	speech: SpeechClient,
	chat: ChatClient,
	work_dir: PathBuf,
	language: String,
	max_download_bytes: u64,
	segment_limits: SegmentLimits,
	chunk_words: usize,
	summary_temperature: f32,
	retry_attempts: usize,
}

impl VideoMinutesPipeline {
	pub fn new(config: &Config, speech: SpeechClient, chat: ChatClient) -> Self {
		Self {
			speech,
			chat,
			work_dir: config.work_dir.clone(),
			language: config.language.clone(),
			max_download_bytes: config.max_download_bytes,
			segment_limits: config.segment_limits(),
			chunk_words: config.chunk_words,
			summary_temperature: config.summary_temperature,
			retry_attempts: config.api_retry_attempts,
		}
	}

	async fn run_stages(&self, url: &str, job_dir: &Path) -> Result<PipelineOutput, PipelineError> {
		let acquired = acquire_audio(url, job_dir, self.max_download_bytes).await?;

		let segments = segment_audio(&acquired.audio_path, self.segment_limits).await?;
		info!(title = %acquired.title, segments = segments.len(), "audio ready for transcription");

		let transcription = transcribe::transcribe_segments(&self.speech, segments, &self.language, self.retry_attempts).await?;
		info!(chars = transcription.len(), "transcription complete");

		let summary = summarize::summarize_transcript(&self.chat, &transcription, self.chunk_words, self.summary_temperature, self.retry_attempts).await?;

		Ok(PipelineOutput {
			title: acquired.title,
			transcription,
			summary,
		})
	}
}

#[async_trait]
impl JobPipeline for VideoMinutesPipeline {
	async fn run(&self, job_id: &str, url: &str) -> Result<PipelineOutput, PipelineError> {
		let job_dir = self.work_dir.join(job_id);

		let result = self.run_stages(url, &job_dir).await;

		if let Err(e) = tokio::fs::remove_dir_all(&job_dir).await {
			if e.kind() != std::io::ErrorKind::NotFound {
				warn!(job_id, error = %e, "failed to clean up job working directory");
			}
		}

		result
	}
}
