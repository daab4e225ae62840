use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
	#[error("invalid source URL (must start with http:// or https://): {0}")]
	InvalidUrl(String),

	#[error("yt-dlp not found on PATH")]
	ToolMissing,

	#[error("source unavailable: {0}")]
	SourceUnavailable(String),

	#[error("no audio stream produced for the source")]
	NoAudioStream,

	#[error("downloaded file path is outside the working directory")]
	PathEscape,

	#[error("audio payload is {actual} bytes, above the configured maximum of {limit}")]
	PayloadTooLarge { actual: u64, limit: u64 },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Audio downloaded for one job, plus the source's human-readable title.
pub struct AcquiredAudio {
	pub title: String,
	pub audio_path: PathBuf,
	pub bytes: u64,
}

#[derive(Deserialize)]
struct ProbeInfo {
	title: Option<String>,
	duration: Option<f64>,
}

fn validate_url(url: &str) -> Result<(), AcquireError> {
	let trimmed = url.trim();
	if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
		Ok(())
	} else {
		Err(AcquireError::InvalidUrl(trimmed.to_string()))
	}
}

/// Download the best audio stream for `url` into `work_dir`.
///
/// Arguments go to yt-dlp via `.arg()` (no shell expansion) and `--no-exec`
/// blocks post-processing commands. The reported output path must stay inside
/// `work_dir`.
pub async fn acquire_audio(url: &str, work_dir: &Path, max_download_bytes: u64) -> Result<AcquiredAudio, AcquireError> {
	validate_url(url)?;

	let check = tokio::process::Command::new("yt-dlp").arg("--version").output().await;
	if check.is_err() {
		return Err(AcquireError::ToolMissing);
	}

	tokio::fs::create_dir_all(work_dir).await?;

	info!(%url, "probing source metadata");

	let probe_output = tokio::process::Command::new("yt-dlp")
		.args(["--dump-json", "--no-download", "--no-playlist", "--no-exec"])
		.arg(url)
		.output()
		.await?;

	let probe: Option<ProbeInfo> = if probe_output.status.success() {
		serde_json::from_slice(&probe_output.stdout).ok()
	} else {
		None
	};

	if let Some(duration) = probe.as_ref().and_then(|info| info.duration) {
		debug!(duration_secs = duration, "source duration reported");
	}

	let output_template = work_dir.join("%(id)s.%(ext)s").to_string_lossy().into_owned();

	info!(%url, "downloading audio stream");

	let output = tokio::process::Command::new("yt-dlp")
		.args(["-f", "bestaudio", "--no-playlist", "--no-exec", "--output", &output_template, "--print", "after_move:filepath"])
		.arg(url)
		.output()
		.await?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		let truncated: String = stderr.chars().take(1000).collect();
		return Err(AcquireError::SourceUnavailable(truncated));
	}

	let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();
	if reported.is_empty() {
		return Err(AcquireError::NoAudioStream);
	}

	let audio_path = PathBuf::from(&reported);
	validate_path_in_dir(&audio_path, work_dir)?;

	if !audio_path.exists() {
		return Err(AcquireError::NoAudioStream);
	}

	let bytes = tokio::fs::metadata(&audio_path).await?.len();
	if bytes > max_download_bytes {
		return Err(AcquireError::PayloadTooLarge {
			actual: bytes,
			limit: max_download_bytes,
		});
	}

	let title = probe.and_then(|info| info.title).unwrap_or_else(|| url.to_string());

	info!(%title, bytes, path = %audio_path.display(), "audio downloaded");

	Ok(AcquiredAudio { title, audio_path, bytes })
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
	use std::path::Component;

	let mut parts = Vec::new();
	for component in path.components() {
		match component {
			Component::ParentDir => {
				parts.pop();
			}
			Component::CurDir => {}
			other => parts.push(other),
		}
	}
	parts.iter().collect()
}

fn validate_path_in_dir(path: &Path, expected_dir: &Path) -> Result<(), AcquireError> {
	let canonical_dir = expected_dir.canonicalize().unwrap_or_else(|_| normalize_path(expected_dir));
	let canonical_path = path.canonicalize().unwrap_or_else(|_| normalize_path(path));

	if canonical_path.starts_with(&canonical_dir) {
		Ok(())
	} else {
		warn!(path = %path.display(), expected_dir = %expected_dir.display(), "downloaded file path outside working directory");
		Err(AcquireError::PathEscape)
	}
}
