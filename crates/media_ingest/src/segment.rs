use std::path::Path;
use tracing::{debug, info};

/// Sample rate every segment is decoded to before re-encoding.
pub const SEGMENT_SAMPLE_RATE: u32 = 16_000;

/// Canonical WAV header size for a 16-bit mono PCM file.
const WAV_HEADER_BYTES: u64 = 44;
const BYTES_PER_SAMPLE: u64 = 2;

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
	#[error("ffmpeg not found on PATH")]
	ToolMissing,

	#[error("audio decode failed: {0}")]
	Decode(String),

	#[error("decoded audio stream is empty")]
	EmptyAudio,

	#[error("WAV encode failed: {0}")]
	Encode(#[from] hound::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// One time-bounded slice of the source audio, encoded as an uploadable WAV.
pub struct AudioSegment {
	pub index: usize,
	pub wav_bytes: Vec<u8>,
	pub duration_secs: f64,
}

/// Upload ceilings imposed by the transcription API.
#[derive(Debug, Clone, Copy)]
pub struct SegmentLimits {
	pub max_segment_secs: u64,
	pub max_segment_bytes: u64,
}

impl SegmentLimits {
	/// Samples per segment honoring both the duration and the byte ceiling.
	///
	/// WAV at 16 kHz mono s16 costs 32 000 bytes per second plus a fixed
	/// header, so the byte ceiling translates directly into a sample count.
	fn max_samples_per_segment(&self) -> usize {
		let by_duration = self.max_segment_secs * u64::from(SEGMENT_SAMPLE_RATE);
		let by_size = self.max_segment_bytes.saturating_sub(WAV_HEADER_BYTES) / BYTES_PER_SAMPLE;

		usize::try_from(by_duration.min(by_size)).unwrap_or(usize::MAX).max(1)
	}
}

/// Decode `path` and split it into ordered, gap-free WAV segments.
pub async fn segment_audio(path: &Path, limits: SegmentLimits) -> Result<Vec<AudioSegment>, SegmentError> {
	let samples = decode_to_pcm(path).await?;

	let total_secs = samples.len() as f64 / f64::from(SEGMENT_SAMPLE_RATE);
	info!(samples = samples.len(), duration_secs = format!("{total_secs:.1}"), "audio decoded");

	let segments = split_samples(&samples, limits)?;
	debug!(count = segments.len(), "audio segmented");

	Ok(segments)
}

/// Decode any audio file to 16 kHz mono s16le via an ffmpeg subprocess.
///
/// ffmpeg handles decoding, resampling, and channel mixing in one shot.
async fn decode_to_pcm(path: &Path) -> Result<Vec<i16>, SegmentError> {
	let output = tokio::process::Command::new("ffmpeg")
		.args(["-nostdin", "-threads", "0", "-i"])
		.arg(path)
		.args(["-f", "s16le", "-ac", "1", "-acodec", "pcm_s16le", "-ar", &SEGMENT_SAMPLE_RATE.to_string(), "-"])
		.output()
		.await
		.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				SegmentError::ToolMissing
			} else {
				SegmentError::Decode(format!("failed to run ffmpeg: {e}"))
			}
		})?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		let truncated: String = stderr.chars().take(1000).collect();
		return Err(SegmentError::Decode(format!("ffmpeg failed: {truncated}")));
	}

	if output.stdout.is_empty() {
		return Err(SegmentError::EmptyAudio);
	}

	let samples: Vec<i16> = output.stdout.chunks_exact(2).map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]])).collect();

	Ok(samples)
}

/// Split on time boundaries only; a segment may cut mid-word.
fn split_samples(samples: &[i16], limits: SegmentLimits) -> Result<Vec<AudioSegment>, SegmentError> {
	if samples.is_empty() {
		return Err(SegmentError::EmptyAudio);
	}

	let max_samples = limits.max_samples_per_segment();

	samples
		.chunks(max_samples)
		.enumerate()
		.map(|(index, chunk)| {
			Ok(AudioSegment {
				index,
				wav_bytes: encode_wav(chunk)?,
				duration_secs: chunk.len() as f64 / f64::from(SEGMENT_SAMPLE_RATE),
			})
		})
		.collect()
}

fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, hound::Error> {
	let spec = hound::WavSpec {
		channels: 1,
		sample_rate: SEGMENT_SAMPLE_RATE,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};

	let mut cursor = std::io::Cursor::new(Vec::new());
	{
		let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
		for &sample in samples {
			writer.write_sample(sample)?;
		}
		writer.finalize()?;
	}

	Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn limits(secs: u64, bytes: u64) -> SegmentLimits {
		SegmentLimits {
			max_segment_secs: secs,
			max_segment_bytes: bytes,
		}
	}

	fn decode_wav(bytes: &[u8]) -> Vec<i16> {
		let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
		reader.samples::<i16>().map(Result::unwrap).collect()
	}

	fn ramp(len: usize) -> Vec<i16> {
		(0..len).map(|i| (i % 1000) as i16).collect()
	}

	#[test]
	fn segments_cover_input_without_gaps_or_overlap() {
		// 10s of audio, 3s segments
		let samples = ramp(10 * SEGMENT_SAMPLE_RATE as usize);
		let segments = split_samples(&samples, limits(3, u64::MAX)).unwrap();

		let rejoined: Vec<i16> = segments.iter().flat_map(|s| decode_wav(&s.wav_bytes)).collect();
		assert_eq!(rejoined, samples);

		let total: f64 = segments.iter().map(|s| s.duration_secs).sum();
		assert!((total - 10.0).abs() < 1e-9);
	}

	#[test]
	fn every_segment_respects_the_duration_ceiling() {
		let samples = ramp(10 * SEGMENT_SAMPLE_RATE as usize);
		let segments = split_samples(&samples, limits(3, u64::MAX)).unwrap();

		assert_eq!(segments.len(), 4);
		for segment in &segments {
			assert!(segment.duration_secs <= 3.0);
		}
	}

	#[test]
	fn byte_ceiling_shortens_segments_below_the_duration_ceiling() {
		// 4s of audio; byte ceiling allows only 1s per segment
		let one_second_bytes = WAV_HEADER_BYTES + u64::from(SEGMENT_SAMPLE_RATE) * BYTES_PER_SAMPLE;
		let samples = ramp(4 * SEGMENT_SAMPLE_RATE as usize);
		let segments = split_samples(&samples, limits(1390, one_second_bytes)).unwrap();

		assert_eq!(segments.len(), 4);
		for segment in &segments {
			assert!(segment.duration_secs <= 1.0);
			assert!(segment.wav_bytes.len() as u64 <= one_second_bytes);
		}
	}

	#[test]
	fn segments_are_indexed_in_order() {
		let samples = ramp(5 * SEGMENT_SAMPLE_RATE as usize);
		let segments = split_samples(&samples, limits(2, u64::MAX)).unwrap();
		let indices: Vec<usize> = segments.iter().map(|s| s.index).collect();
		assert_eq!(indices, vec![0, 1, 2]);
	}

	#[test]
	fn empty_audio_is_an_error() {
		assert!(matches!(split_samples(&[], limits(3, u64::MAX)), Err(SegmentError::EmptyAudio)));
	}

	#[test]
	fn short_input_yields_a_single_segment() {
		let samples = ramp(SEGMENT_SAMPLE_RATE as usize / 2);
		let segments = split_samples(&samples, limits(1390, 25 * 1024 * 1024)).unwrap();
		assert_eq!(segments.len(), 1);
		assert!((segments[0].duration_secs - 0.5).abs() < 1e-9);
	}
}
