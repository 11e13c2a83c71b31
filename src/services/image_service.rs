use std::{path::Path, sync::Arc, time::Duration};

use chrono::Utc;

use super::{response::ServiceError, schemas::PresignedUpload};
use crate::{adapters::object_storage::ObjectStorage, config::Config, domain::id::ObjectId};

/// Upload types accepted for presigning, by file extension.
const PRESIGN_ALLOWED_TYPES: [(&str, &str); 4] =
	[("jpeg", "image/jpeg"), ("jpg", "image/jpeg"), ("png", "image/png"), ("bmp", "image/bmp")];

pub struct ImageService {
	storage: Arc<dyn ObjectStorage>,
	original_image_path: String,
	processed_image_path: String,
	public_bucket_url: String,
	presign_expiration: Duration,
}

impl ImageService {
	pub fn new(
		storage: Arc<dyn ObjectStorage>,
		config: &Config,
	) -> Self {
		Self {
			storage,
			original_image_path: config.original_image_path.clone(),
			processed_image_path: config.processed_image_path.clone(),
			public_bucket_url: config.public_bucket_url.clone(),
			presign_expiration: config.presign_expiration,
		}
	}

	/// Issues a URL the client uploads the raw image to, under a fresh key.
	pub async fn presigned_upload(
		&self,
		file_name: &str,
		file_size: i64,
	) -> Result<PresignedUpload, ServiceError> {
		if file_size <= 0 {
			tracing::warn!(file_name, file_size, "rejecting presign request with invalid file size");
			return Err(ServiceError::InvalidRequest);
		}
		let extension = Path::new(file_name)
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| ext.to_ascii_lowercase())
			.unwrap_or_default();
		let content_type = PRESIGN_ALLOWED_TYPES
			.iter()
			.find(|(allowed, _)| *allowed == extension)
			.map(|(_, content_type)| *content_type)
			.ok_or_else(|| {
				tracing::warn!(file_name, "presign requested for unsupported content type");
				ServiceError::InvalidContentType
			})?;

		let image_path = format!("{}{}.{}", self.original_image_path, ObjectId::new(), extension);
		let now = Utc::now();
		let url = self
			.storage
			.presigned_upload_url(&image_path, content_type, file_size, self.presign_expiration)
			.await?;

		tracing::debug!(image_path = %image_path, "issued presigned upload url");
		Ok(PresignedUpload {
			url,
			image_path,
			expires_at: now.timestamp() + self.presign_expiration.as_secs() as i64,
		})
	}

	pub async fn raw_image_exists(
		&self,
		image_path: &str,
	) -> Result<bool, ServiceError> {
		self.storage.exists(image_path).await.map_err(|err| {
			tracing::error!(image_path, error = %err, "failed to check if image exists");
			ServiceError::ImageExistsCheckFailed
		})
	}

	/// Copies the raw upload to the processed prefix and returns the new key.
	///
	/// Images are not transformed yet; the bytes are uploaded unchanged.
	pub async fn resize_and_upload(
		&self,
		image_path: &str,
	) -> Result<String, ServiceError> {
		let original = self.storage.download(image_path).await.map_err(|err| {
			tracing::error!(image_path, error = %err, "failed to download image");
			ServiceError::ImageDownloadFailed
		})?;

		let file_name = Path::new(image_path).file_name().and_then(|name| name.to_str()).unwrap_or(image_path);
		let upload_path = format!("{}{}", self.processed_image_path, file_name);

		self.storage.upload(&upload_path, original).await.map_err(|err| {
			tracing::error!(upload_path = %upload_path, error = %err, "failed to upload image");
			ServiceError::ImageUploadFailed
		})?;

		Ok(upload_path)
	}

	pub fn public_url(
		&self,
		image_path: &str,
	) -> String {
		if image_path.is_empty() {
			return String::new();
		}
		format!("{}{}", self.public_bucket_url, image_path)
	}
}

/// File stem of a storage key, e.g. `processed/abc.jpg` gives `abc`.
pub fn image_id(image_path: &str) -> String {
	Path::new(image_path).file_stem().and_then(|stem| stem.to_str()).unwrap_or_default().to_string()
}
