use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use serde_json::json;

use crate::adapters::StorageError;
use crate::services::schemas::{CreatedComment, CreatedPost, DeletedComment, FetchPostsResponse, PresignedUpload};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
	Post(CreatedPost),
	Posts(FetchPostsResponse),
	Comment(CreatedComment),
	DeletedComment(DeletedComment),
	Presigned(PresignedUpload),
}

impl From<CreatedPost> for ServiceResponse {
	fn from(value: CreatedPost) -> Self {
		ServiceResponse::Post(value)
	}
}

impl From<FetchPostsResponse> for ServiceResponse {
	fn from(value: FetchPostsResponse) -> Self {
		ServiceResponse::Posts(value)
	}
}

impl From<CreatedComment> for ServiceResponse {
	fn from(value: CreatedComment) -> Self {
		ServiceResponse::Comment(value)
	}
}

impl From<DeletedComment> for ServiceResponse {
	fn from(value: DeletedComment) -> Self {
		ServiceResponse::DeletedComment(value)
	}
}

impl From<PresignedUpload> for ServiceResponse {
	fn from(value: PresignedUpload) -> Self {
		ServiceResponse::Presigned(value)
	}
}

impl IntoResponse for ServiceResponse {
	fn into_response(self) -> Response {
		(StatusCode::OK, Json(json!({ "code": 0, "message": "success", "data": self }))).into_response()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("Invalid request")]
	InvalidRequest,
	#[error("Invalid presign content type")]
	InvalidContentType,
	#[error("Post not found")]
	PostNotFound,
	#[error("Comment not found")]
	CommentNotFound,
	#[error("User not found")]
	UserNotFound,
	#[error("Image not found")]
	ImageNotFound,
	#[error("Comment not allowed")]
	CommentNotAllowed,
	#[error("Comment operation not allowed")]
	CommentOperationNotAllowed,
	/// Raised only inside the aggregate fold once its retries are exhausted.
	#[error("Post with version not found")]
	VersionConflict,
	#[error("Failed to check if image exists")]
	ImageExistsCheckFailed,
	#[error("Failed to download image")]
	ImageDownloadFailed,
	#[error("Failed to upload image")]
	ImageUploadFailed,
	#[error("Internal server error")]
	InternalError,
	#[error("Invalid configuration: {0}")]
	Config(String),
}

impl ServiceError {
	pub fn code(&self) -> i32 {
		match self {
			Self::InvalidRequest => 1004,
			Self::ImageNotFound => 3001,
			Self::ImageUploadFailed => 3002,
			Self::ImageDownloadFailed => 3004,
			Self::InvalidContentType => 3005,
			Self::ImageExistsCheckFailed => 3008,
			Self::CommentNotAllowed => 3100,
			Self::CommentOperationNotAllowed => 3101,
			Self::UserNotFound => 3200,
			Self::PostNotFound => 3300,
			Self::VersionConflict => 3301,
			Self::CommentNotFound => 3400,
			Self::InternalError | Self::Config(_) => 5001,
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Self::InvalidRequest | Self::InvalidContentType | Self::CommentNotAllowed | Self::CommentOperationNotAllowed => {
				StatusCode::BAD_REQUEST
			}
			Self::PostNotFound | Self::CommentNotFound | Self::UserNotFound | Self::ImageNotFound => StatusCode::NOT_FOUND,
			Self::VersionConflict
			| Self::ImageExistsCheckFailed
			| Self::ImageDownloadFailed
			| Self::ImageUploadFailed
			| Self::InternalError
			| Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<StorageError> for ServiceError {
	fn from(err: StorageError) -> Self {
		tracing::error!(error = %err, "storage failure");
		ServiceError::InternalError
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		// Internal details stay in the logs.
		let message = match self.status() {
			StatusCode::INTERNAL_SERVER_ERROR => ServiceError::InternalError.to_string(),
			_ => self.to_string(),
		};
		(self.status(), Json(json!({ "code": self.code(), "message": message }))).into_response()
	}
}
