use crate::registry::JobId;
use crate::AppState;
use tracing::{error, info};

/// Launch one background task that runs the pipeline for a job and writes
/// exactly one terminal state into the registry.
///
/// Errors are absorbed at this boundary: a failed job never tears down other
/// jobs or the server.
pub fn spawn_job(state: &AppState, job_id: JobId, url: String) {
	let jobs = state.jobs.clone();
	let pipeline = state.pipeline.clone();

	tokio::spawn(async move {
		info!(%job_id, %url, "job started");

		match pipeline.run(&job_id, &url).await {
			Ok(output) => {
				info!(%job_id, title = %output.title, "job finished");
				jobs.complete(&job_id, output).await;
			}
			Err(err) => {
				error!(%job_id, error = %err, "job failed");
				jobs.fail(&job_id, err.to_string()).await;
			}
		}
	});
}
