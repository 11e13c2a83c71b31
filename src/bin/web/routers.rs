use axum::{
	http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
	Router,
};
use feed::{bootstrap::AppState, common::middleware_custom_header::USER_ID_HEADER, config::Config, routes::create_routes};
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

const SERVICE_NAME: &str = "/feed";

pub fn app(
	state: AppState,
	config: &Config,
) -> Router {
	Router::new()
		.nest(SERVICE_NAME, create_routes(state))
		.layer(
			CorsLayer::new()
				.allow_origin(allowed_origins(&config.allow_origins))
				.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
				.allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]),
		)
		.layer(TraceLayer::new_for_http())
}

/// `ALLOW_ORIGINS` is comma separated. Unparsable entries are skipped.
fn allowed_origins(origins: &str) -> AllowOrigin {
	let origins: Vec<HeaderValue> = origins
		.split(',')
		.map(str::trim)
		.filter(|origin| !origin.is_empty())
		.filter_map(|origin| match origin.parse::<HeaderValue>() {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(origin, "ignoring invalid CORS origin");
				None
			}
		})
		.collect();
	AllowOrigin::list(origins)
}
