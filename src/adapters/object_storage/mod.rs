pub mod memory;
pub mod s3;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::StorageError;

pub use memory::MemoryObjectStorage;
pub use s3::S3ObjectStorage;

/// Bucket holding raw uploads and processed images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
	async fn presigned_upload_url(
		&self,
		key: &str,
		content_type: &str,
		content_length: i64,
		ttl: Duration,
	) -> Result<String, StorageError>;

	async fn download(
		&self,
		key: &str,
	) -> Result<Bytes, StorageError>;

	async fn upload(
		&self,
		key: &str,
		body: Bytes,
	) -> Result<(), StorageError>;

	async fn exists(
		&self,
		key: &str,
	) -> Result<bool, StorageError>;
}
