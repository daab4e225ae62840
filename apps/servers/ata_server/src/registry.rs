use crate::pipeline::PipelineOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
	Processing,
	Done,
	Error,
}

/// One end-to-end summarization request.
///
/// `status` fully determines which other fields are populated: `processing`
/// carries nothing, `done` carries the three content fields, `error` carries
/// only the failure description.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
	#[serde(skip)]
	pub id: JobId,

	pub status: JobStatus,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub transcription: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl Job {
	fn processing(id: JobId) -> Self {
		Self {
			id,
			status: JobStatus::Processing,
			title: None,
			transcription: None,
			summary: None,
			error: None,
		}
	}

	pub const fn is_terminal(&self) -> bool {
		matches!(self.status, JobStatus::Done | JobStatus::Error)
	}
}

/// Registry of jobs for the process lifetime.
///
/// One writer per key (that job's worker task), arbitrary concurrent readers.
/// Terminal transitions replace the whole record so a concurrent read never
/// observes a partially-written job.
#[async_trait]
pub trait JobStore: Send + Sync {
	/// Create a new job in `processing` state and return it.
	async fn create(&self) -> Job;

	async fn get(&self, id: &str) -> Option<Job>;

	/// Transition a job to `done` with its pipeline output.
	async fn complete(&self, id: &str, output: PipelineOutput);

	/// Transition a job to `error` with a caller-visible description.
	async fn fail(&self, id: &str, error: String);
}

#[derive(Default)]
pub struct InMemoryJobStore {
	jobs: DashMap<JobId, Job>,
}

impl InMemoryJobStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl JobStore for InMemoryJobStore {
	async fn create(&self) -> Job {
		let job = Job::processing(Uuid::new_v4().to_string());
		self.jobs.insert(job.id.clone(), job.clone());
		job
	}

	async fn get(&self, id: &str) -> Option<Job> {
		self.jobs.get(id).map(|entry| entry.clone())
	}

	async fn complete(&self, id: &str, output: PipelineOutput) {
		let job = Job {
			id: id.to_string(),
			status: JobStatus::Done,
			title: Some(output.title),
			transcription: Some(output.transcription),
			summary: Some(output.summary),
			error: None,
		};

		// Whole-record insert, never field-by-field mutation
		self.jobs.insert(id.to_string(), job);
	}

	async fn fail(&self, id: &str, error: String) {
		let job = Job {
			id: id.to_string(),
			status: JobStatus::Error,
			title: None,
			transcription: None,
			summary: None,
			error: Some(error),
		};

		self.jobs.insert(id.to_string(), job);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn output() -> PipelineOutput {
		PipelineOutput {
			title: "Sessão Ordinária 12/03".to_string(),
			transcription: "boa tarde a todos".to_string(),
			summary: "Principais Pontos:\n- abertura".to_string(),
		}
	}

	#[tokio::test]
	async fn new_jobs_start_processing_with_no_content_fields() {
		let store = InMemoryJobStore::new();
		let job = store.create().await;

		assert_eq!(job.status, JobStatus::Processing);
		assert!(!job.is_terminal());

		let value = serde_json::to_value(&job).unwrap();
		assert_eq!(value, serde_json::json!({ "status": "processing" }));
	}

	#[tokio::test]
	async fn job_ids_are_unique() {
		let store = InMemoryJobStore::new();
		let first = store.create().await;
		let second = store.create().await;
		assert_ne!(first.id, second.id);
	}

	#[tokio::test]
	async fn completing_populates_every_content_field() {
		let store = InMemoryJobStore::new();
		let job = store.create().await;

		store.complete(&job.id, output()).await;

		let job = store.get(&job.id).await.unwrap();
		assert_eq!(job.status, JobStatus::Done);
		assert!(job.is_terminal());

		let value = serde_json::to_value(&job).unwrap();
		assert_eq!(value["status"], "done");
		assert!(!value["title"].as_str().unwrap().is_empty());
		assert!(!value["transcription"].as_str().unwrap().is_empty());
		assert!(!value["summary"].as_str().unwrap().is_empty());
		assert!(value.get("error").is_none());
	}

	#[tokio::test]
	async fn failing_discards_all_partial_work() {
		let store = InMemoryJobStore::new();
		let job = store.create().await;

		store.fail(&job.id, "Video unavailable".to_string()).await;

		let job = store.get(&job.id).await.unwrap();
		assert_eq!(job.status, JobStatus::Error);

		let value = serde_json::to_value(&job).unwrap();
		assert_eq!(value, serde_json::json!({ "status": "error", "error": "Video unavailable" }));
	}

	#[tokio::test]
	async fn unknown_ids_read_as_absent() {
		let store = InMemoryJobStore::new();
		assert!(store.get("no-such-job").await.is_none());
	}
}
