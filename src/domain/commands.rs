use serde::Deserialize;

use crate::services::response::ServiceError;

/// Upper bound on post and comment text, in UTF-8 bytes.
pub const MAX_CONTENT_BYTES: usize = 1000;

pub fn validate_content(content: &str) -> Result<(), ServiceError> {
	if content.is_empty() || content.len() > MAX_CONTENT_BYTES {
		tracing::warn!(content_bytes = content.len(), "content is empty or too long");
		return Err(ServiceError::InvalidRequest);
	}
	Ok(())
}

/// `user_id` is never read from the body; routes fill it from the `userId` header.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
	#[serde(skip_deserializing)]
	pub user_id: String,
	pub content: String,
	#[serde(default)]
	pub image_file_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPosts {
	#[serde(default = "FetchPosts::default_limit")]
	pub limit: i64,
	#[serde(default)]
	pub previous_cursor: Option<String>,
	#[serde(default)]
	pub order_by: Option<String>,
}

impl FetchPosts {
	fn default_limit() -> i64 {
		10
	}
}

impl Default for FetchPosts {
	fn default() -> Self {
		Self {
			limit: Self::default_limit(),
			previous_cursor: None,
			order_by: None,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
	#[serde(skip_deserializing)]
	pub user_id: String,
	#[serde(skip_deserializing)]
	pub post_id: String,
	pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteComment {
	pub user_id: String,
	pub post_id: String,
	pub comment_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignUpload {
	pub file_name: String,
	pub file_size: i64,
}

#[test]
fn test_command_representation() {
	let create_post: CreatePost =
		serde_json::from_str(r#"{"content":"hello","imageFilePath":"original/x.jpg","userId":"ignored"}"#).unwrap();
	assert_eq!(create_post.content, "hello");
	assert_eq!(create_post.image_file_path.as_deref(), Some("original/x.jpg"));
	assert!(create_post.user_id.is_empty());

	let fetch: FetchPosts = serde_json::from_str(r#"{"orderBy":"comment_count"}"#).unwrap();
	assert_eq!(fetch.limit, 10);
	assert_eq!(fetch.order_by.as_deref(), Some("comment_count"));
}

#[test]
fn test_content_bounds() {
	assert!(validate_content("").is_err());
	assert!(validate_content(&"a".repeat(MAX_CONTENT_BYTES)).is_ok());
	assert!(validate_content(&"a".repeat(MAX_CONTENT_BYTES + 1)).is_err());
	// 334 three-byte characters
	assert!(validate_content(&"한".repeat(334)).is_err());
}
