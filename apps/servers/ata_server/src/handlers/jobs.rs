use crate::error::AtaServerError;
use crate::registry::Job;
use crate::{worker, AppState};
use axum::{
	extract::{Form, Path, State},
	Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub struct StartJobRequest {
	pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StartJobResponse {
	pub job_id: String,
}

/// Create a job and return its identifier immediately.
///
/// The URL is not validated for reachability here; an unreachable source
/// surfaces later as the job's `error` state.
#[axum::debug_handler]
#[instrument(name = "start_job", skip(state, payload))]
pub async fn start_job(State(state): State<AppState>, Form(payload): Form<StartJobRequest>) -> Result<Json<StartJobResponse>, AtaServerError> {
	let job = state.jobs.create().await;
	info!(job_id = %job.id, url = %payload.url, "job created");

	worker::spawn_job(&state, job.id.clone(), payload.url);

	Ok(Json(StartJobResponse { job_id: job.id }))
}

#[axum::debug_handler]
#[instrument(name = "job_status", skip(state))]
pub async fn job_status(State(state): State<AppState>, Path(job_id): Path<String>) -> Result<Json<Job>, AtaServerError> {
	match state.jobs.get(&job_id).await {
		Some(job) => Ok(Json(job)),
		None => Err(AtaServerError::JobNotFound),
	}
}
