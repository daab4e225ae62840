use crate::handlers::jobs as routes;
use crate::AppState;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;

pub fn job_routes<S>(allowed_origins: &str) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
	AppState: FromRef<S>,
{
	Router::new()
		.route("/start-job", post(routes::start_job))
		.route("/job-status/:job_id", get(routes::job_status))
		.layer(super::cors_layer(allowed_origins))
}
