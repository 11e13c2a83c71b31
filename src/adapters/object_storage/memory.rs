use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::ObjectStorage;
use crate::adapters::StorageError;

#[derive(Default)]
pub struct MemoryObjectStorage {
	objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryObjectStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn put(
		&self,
		key: impl Into<String>,
		body: impl Into<Bytes>,
	) {
		self.objects.write().await.insert(key.into(), body.into());
	}

	pub async fn get(
		&self,
		key: &str,
	) -> Option<Bytes> {
		self.objects.read().await.get(key).cloned()
	}
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
	async fn presigned_upload_url(
		&self,
		key: &str,
		content_type: &str,
		content_length: i64,
		ttl: Duration,
	) -> Result<String, StorageError> {
		Ok(format!(
			"memory:///{key}?content-type={content_type}&content-length={content_length}&expires-in={}",
			ttl.as_secs()
		))
	}

	async fn download(
		&self,
		key: &str,
	) -> Result<Bytes, StorageError> {
		self.get(key).await.ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
	}

	async fn upload(
		&self,
		key: &str,
		body: Bytes,
	) -> Result<(), StorageError> {
		self.put(key, body).await;
		Ok(())
	}

	async fn exists(
		&self,
		key: &str,
	) -> Result<bool, StorageError> {
		Ok(self.objects.read().await.contains_key(key))
	}
}
