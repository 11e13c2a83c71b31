mod routers;

use feed::{bootstrap::Bootstrap, config::Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
	println!("Environment Variable Is Being Set...");
	let config = Config::new().unwrap();

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("{},feed=debug,tower_http=debug,axum::rejection=trace", config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Connection
	println!("Connections Are Being Pooled...");
	let state = Bootstrap::app_state(&config).await.unwrap();

	let app = routers::app(state, &config);

	println!("Start Web Server...");
	let listener = TcpListener::bind(&config.server_ip_port).await.unwrap();
	tracing::info!("listening on {}", config.server_ip_port);
	axum::serve(listener, app).await.unwrap();
}
