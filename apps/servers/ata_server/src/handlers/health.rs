use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
pub struct HealthResponse {
	status: &'static str,
	service: &'static str,
	version: &'static str,
}

#[axum::debug_handler]
#[instrument(name = "health")]
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
	let response = HealthResponse {
		status: "ok",
		service: env!("CARGO_PKG_NAME"),
		version: env!("CARGO_PKG_VERSION"), // pulled from Cargo.toml at compile time
	};

	(StatusCode::OK, Json(response))
}
