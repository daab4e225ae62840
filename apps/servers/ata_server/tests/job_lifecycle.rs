// End-to-end job lifecycle against the real router, with the pipeline
// stubbed out so no external tool or API is needed.

use ata_server::{routes, AppState, Config, InMemoryJobStore, JobPipeline, PipelineError, PipelineOutput};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

struct StubPipeline {
	gate: Arc<Semaphore>,
	fail: bool,
}

#[async_trait]
impl JobPipeline for StubPipeline {
	async fn run(&self, _job_id: &str, url: &str) -> Result<PipelineOutput, PipelineError> {
		let permit = self.gate.acquire().await.expect("gate closed");
		permit.forget();

		if self.fail {
			return Err(PipelineError::Acquire(media_ingest::AcquireError::SourceUnavailable("ERROR: Video unavailable".to_string())));
		}

		Ok(PipelineOutput {
			title: format!("Sessão Ordinária ({url})"),
			transcription: "boa tarde a todos declaro aberta a sessão".to_string(),
			summary: "Principais Pontos:\n- abertura da sessão\n- votação do projeto 12/2024".to_string(),
		})
	}
}

fn test_state(fail: bool) -> (AppState, Arc<Semaphore>) {
	let gate = Arc::new(Semaphore::new(0));
	let config = Config::parse_from(["ata-server", "--openai-api-key", "test-key"]);

	let state = AppState {
		config: Arc::new(config),
		jobs: Arc::new(InMemoryJobStore::new()),
		pipeline: Arc::new(StubPipeline { gate: gate.clone(), fail }),
		cancel_token: CancellationToken::new(),
	};

	(state, gate)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

async fn start_job(app: &axum::Router, url: &str) -> String {
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/start-job")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(Body::from(format!("url={url}")))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	body["job_id"].as_str().expect("job_id missing").to_string()
}

async fn job_status(app: &axum::Router, job_id: &str) -> (StatusCode, serde_json::Value) {
	let response = app
		.clone()
		.oneshot(Request::builder().uri(format!("/job-status/{job_id}")).body(Body::empty()).unwrap())
		.await
		.unwrap();

	let status = response.status();
	(status, body_json(response).await)
}

async fn wait_until_terminal(app: &axum::Router, job_id: &str) -> serde_json::Value {
	for _ in 0..200 {
		let (status, body) = job_status(app, job_id).await;
		assert_eq!(status, StatusCode::OK);
		if body["status"] != "processing" {
			return body;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
	panic!("job {job_id} never reached a terminal state");
}

#[tokio::test]
async fn unknown_job_id_returns_404_detail() {
	let (state, _gate) = test_state(false);
	let app = routes::app_router(state);

	let (status, body) = job_status(&app, "b1946ac9-2d6a-4b0e-8d6e-000000000000").await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body, serde_json::json!({ "detail": "job not found" }));
}

#[tokio::test]
async fn liveness_probe_reports_ok() {
	let (state, _gate) = test_state(false);
	let app = routes::app_router(state);

	let response = app.clone().oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn successful_job_moves_from_processing_to_done() {
	let (state, gate) = test_state(false);
	let app = routes::app_router(state);

	let job_id = start_job(&app, "https://example.com/video123").await;

	// The pipeline is gated, so the job must still be processing
	let (status, body) = job_status(&app, &job_id).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "status": "processing" }));

	gate.add_permits(1);
	let body = wait_until_terminal(&app, &job_id).await;

	assert_eq!(body["status"], "done");
	assert!(!body["title"].as_str().unwrap().is_empty());
	assert!(!body["transcription"].as_str().unwrap().is_empty());
	assert!(body["summary"].as_str().unwrap().starts_with("Principais Pontos:"));
	assert!(body.get("error").is_none());
}

#[tokio::test]
async fn failed_job_surfaces_the_error_and_nothing_else() {
	let (state, gate) = test_state(true);
	let app = routes::app_router(state);

	let job_id = start_job(&app, "https://example.com/private-video").await;
	gate.add_permits(1);

	let body = wait_until_terminal(&app, &job_id).await;

	assert_eq!(body["status"], "error");
	assert!(!body["error"].as_str().unwrap().is_empty());
	assert!(body.get("title").is_none());
	assert!(body.get("transcription").is_none());
	assert!(body.get("summary").is_none());
}

#[tokio::test]
async fn concurrent_jobs_are_independent() {
	let (state, gate) = test_state(false);
	let app = routes::app_router(state);

	let first = start_job(&app, "https://example.com/video-a").await;
	let second = start_job(&app, "https://example.com/video-b").await;
	assert_ne!(first, second);

	// Release both gated pipeline runs
	gate.add_permits(2);

	let first_body = wait_until_terminal(&app, &first).await;
	let second_body = wait_until_terminal(&app, &second).await;

	assert_eq!(first_body["status"], "done");
	assert_eq!(second_body["status"], "done");
	assert!(first_body["title"].as_str().unwrap().contains("video-a"));
	assert!(second_body["title"].as_str().unwrap().contains("video-b"));
}
