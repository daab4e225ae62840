mod health;
mod jobs;

pub use health::liveness;
pub use jobs::job_routes;

use crate::AppState;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the CORS layer from the configured allow-list.
///
/// `*` allows any origin; otherwise only the listed origins pass the
/// browser's preflight, everything else is rejected before reaching a route.
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
	let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]).allow_headers([CONTENT_TYPE]);

	if allowed_origins.trim() == "*" {
		cors.allow_origin(Any)
	} else {
		let origins: Vec<HeaderValue> = allowed_origins.split(',').filter_map(|origin| origin.trim().parse().ok()).collect();
		cors.allow_origin(AllowOrigin::list(origins))
	}
}

/// Assemble every route for the service.
pub fn app_router(state: AppState) -> Router {
	let allowed_origins = state.config.allowed_origins.clone();

	Router::new().merge(job_routes(&allowed_origins)).merge(liveness()).with_state(state)
}
