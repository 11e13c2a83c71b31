use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
	config::{BehaviorVersion, Region},
	presigning::PresigningConfig,
	primitives::ByteStream,
	Client,
};
use bytes::Bytes;

use super::ObjectStorage;
use crate::{adapters::StorageError, config::S3Settings};

/// S3-compatible bucket. Cloudflare R2 works through a custom endpoint.
#[derive(Clone)]
pub struct S3ObjectStorage {
	client: Client,
	bucket: String,
}

impl S3ObjectStorage {
	pub async fn connect(settings: &S3Settings) -> Self {
		let shared = aws_config::defaults(BehaviorVersion::latest())
			.region(Region::new(settings.region.clone()))
			.load()
			.await;

		let mut builder = aws_sdk_s3::config::Builder::from(&shared);
		if let Some(endpoint) = &settings.endpoint {
			builder = builder.endpoint_url(endpoint).force_path_style(true);
		}

		Self {
			client: Client::from_conf(builder.build()),
			bucket: settings.bucket.clone(),
		}
	}
}

fn object_storage_error(err: impl std::fmt::Display) -> StorageError {
	StorageError::ObjectStorage(err.to_string())
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
	async fn presigned_upload_url(
		&self,
		key: &str,
		content_type: &str,
		content_length: i64,
		ttl: Duration,
	) -> Result<String, StorageError> {
		let presigning = PresigningConfig::expires_in(ttl).map_err(object_storage_error)?;
		let request = self
			.client
			.put_object()
			.bucket(&self.bucket)
			.key(key)
			.content_type(content_type)
			.content_length(content_length)
			.presigned(presigning)
			.await
			.map_err(object_storage_error)?;

		Ok(request.uri().to_string())
	}

	async fn download(
		&self,
		key: &str,
	) -> Result<Bytes, StorageError> {
		let response = self
			.client
			.get_object()
			.bucket(&self.bucket)
			.key(key)
			.send()
			.await
			.map_err(object_storage_error)?;

		let body = response.body.collect().await.map_err(object_storage_error)?;
		Ok(body.into_bytes())
	}

	async fn upload(
		&self,
		key: &str,
		body: Bytes,
	) -> Result<(), StorageError> {
		self.client
			.put_object()
			.bucket(&self.bucket)
			.key(key)
			.body(ByteStream::from(body))
			.send()
			.await
			.map_err(object_storage_error)?;

		Ok(())
	}

	async fn exists(
		&self,
		key: &str,
	) -> Result<bool, StorageError> {
		match self.client.head_object().bucket(&self.bucket).key(key).send().await {
			Ok(_) => Ok(true),
			Err(err) => match err.as_service_error() {
				Some(service_error) if service_error.is_not_found() => Ok(false),
				_ => Err(object_storage_error(&err)),
			},
		}
	}
}
