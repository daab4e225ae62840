use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[derive(thiserror::Error, Debug)]
pub enum AtaServerError {
	#[error("job not found")]
	JobNotFound,

	#[error("request timeout")]
	RequestTimeout,

	#[error("unexpected tower service error: {0}")]
	TowerError(#[from] tower::BoxError),

	#[error("an internal server error occurred")]
	Anyhow(#[from] anyhow::Error),
}

impl AtaServerError {
	const fn status_code(&self) -> StatusCode {
		match self {
			Self::JobNotFound => StatusCode::NOT_FOUND,
			Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
			Self::TowerError(_) | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for AtaServerError {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::JobNotFound => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "detail": "job not found" }))).into_response(),
			Self::Anyhow(ref e) => {
				tracing::error!("Generic error: {:?}", e);
				(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
			}
			// All other errors fall back
			_ => (self.status_code(), self.to_string()).into_response(),
		}
	}
}
