use crate::utils::{retry_async, RETRY_BASE_DELAY, RETRY_FACTOR};
use media_ingest::AudioSegment;
use sdk::{SpeechClient, SpeechError};
use tracing::info;

/// Transcribe ordered segments and join the transcripts with newlines.
///
/// Segments are time-ordered, so transcript order encodes chronology and must
/// be preserved exactly. Calls run sequentially; one segment failure fails the
/// whole transcription (no partial-result fallback).
pub async fn transcribe_segments(speech: &SpeechClient, segments: Vec<AudioSegment>, language: &str, retry_attempts: usize) -> Result<String, SpeechError> {
	let total = segments.len();
	let mut transcripts = Vec::with_capacity(total);

	for segment in segments {
		let file_name = format!("segment-{:03}.wav", segment.index);
		info!(segment = segment.index + 1, total, duration_secs = format!("{:.1}", segment.duration_secs), "transcribing segment");

		let text = retry_async(
			|| speech.transcribe(segment.wav_bytes.clone(), &file_name, language),
			retry_attempts,
			RETRY_BASE_DELAY,
			RETRY_FACTOR,
		)
		.await?;

		transcripts.push(text);
	}

	Ok(transcripts.join("\n"))
}
