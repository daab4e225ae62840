use crate::handlers::health as routes;
use crate::AppState;
use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;

pub fn liveness<S>() -> Router<S>
where
	S: Clone + Send + Sync + 'static,
	AppState: FromRef<S>,
{
	Router::new().route("/", get(routes::health))
}
