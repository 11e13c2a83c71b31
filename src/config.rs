use std::{str::FromStr, time::Duration};

use crate::services::response::ServiceError;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	/// In-memory stores are used when unset.
	pub database_url: Option<String>,
	pub database_max_connections: u32,
	pub allow_origins: String,

	/// Size cap of `Post::recent_comments`.
	pub recent_comments_count: usize,
	pub original_image_path: String,
	pub processed_image_path: String,
	pub presign_expiration: Duration,
	pub public_bucket_url: String,
	/// In-memory object storage is used when unset.
	pub s3: Option<S3Settings>,
}

#[derive(Clone, Debug)]
pub struct S3Settings {
	pub bucket: String,
	pub endpoint: Option<String>,
	pub region: String,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		let log_level = std::env::var("LOG_LEVEL").unwrap_or("warn".to_string());
		let server_ip_port = std::env::var("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let database_url = optional_var("DATABASE_URL");
		let database_max_connections = parsed_var("DATABASE_MAX_CONNECTIONS", 30)?;
		let allow_origins = std::env::var("ALLOW_ORIGINS").unwrap_or("http://localhost:3000,http://localhost:3001".to_string());

		let recent_comments_count = parsed_var("POST_RECENT_COMMENTS_COUNT", 3)?;
		let original_image_path = std::env::var("ORIGINAL_IMAGE_PATH").unwrap_or("original/".to_string());
		let processed_image_path = std::env::var("PROCESSED_IMAGE_PATH").unwrap_or("processed/".to_string());
		let presign_expiration = Duration::from_secs(parsed_var("PRESIGN_EXPIRATION_SEC", 900)?);
		let public_bucket_url = std::env::var("PUBLIC_BUCKET_URL").unwrap_or_default();

		let s3 = optional_var("S3_BUCKET").map(|bucket| S3Settings {
			bucket,
			endpoint: optional_var("S3_ENDPOINT"),
			region: std::env::var("S3_REGION").unwrap_or("auto".to_string()),
		});

		Ok(Config {
			log_level,
			server_ip_port,
			database_url,
			database_max_connections,
			allow_origins,
			recent_comments_count,
			original_image_path,
			processed_image_path,
			presign_expiration,
			public_bucket_url,
			s3,
		})
	}
}

impl Default for Config {
	fn default() -> Self {
		Config {
			log_level: "warn".into(),
			server_ip_port: "0.0.0.0:80".into(),
			database_url: None,
			database_max_connections: 30,
			allow_origins: "http://localhost:3000".into(),
			recent_comments_count: 3,
			original_image_path: "original/".into(),
			processed_image_path: "processed/".into(),
			presign_expiration: Duration::from_secs(900),
			public_bucket_url: String::new(),
			s3: None,
		}
	}
}

fn optional_var(key: &str) -> Option<String> {
	std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parsed_var<T: FromStr>(
	key: &str,
	default: T,
) -> Result<T, ServiceError> {
	match optional_var(key) {
		None => Ok(default),
		Some(value) => value.parse().map_err(|_| ServiceError::Config(format!("{key} has an invalid value: {value}"))),
	}
}
