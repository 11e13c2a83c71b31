use serde::Serialize;

use crate::domain::{
	comment::entity::{Comment, CommentSnapshot},
	post::entity::Post,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPost {
	pub id: String,
	pub creator_id: String,
	pub content: String,
	pub status: String,
	/// Milliseconds since the Unix epoch.
	pub created_at: i64,
}

impl From<&Post> for CreatedPost {
	fn from(post: &Post) -> Self {
		Self {
			id: post.id.to_hex(),
			creator_id: post.creator_id.to_hex(),
			content: post.content.clone(),
			status: post.status.to_string(),
			created_at: post.created_at.timestamp_millis(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
	pub id: String,
	pub created_at: i64,
	pub content: String,
	pub creator_id: String,
	/// As of comment creation.
	pub creator_name: String,
}

impl From<&CommentSnapshot> for CommentView {
	fn from(comment: &CommentSnapshot) -> Self {
		Self {
			id: comment.id.to_hex(),
			created_at: comment.created_at.timestamp_millis(),
			content: comment.content.clone(),
			creator_id: comment.creator_id.to_hex(),
			creator_name: comment.creator_name.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
	pub id: String,
	pub created_at: i64,
	pub content: String,
	pub comment_count: i32,
	pub recent_comments: Vec<CommentView>,
	/// 0 when the post never had a comment.
	pub recent_commented_at: i64,
	pub creator_id: String,
	pub creator_name: String,
	pub image_id: String,
	#[serde(rename = "imageURL")]
	pub image_url: String,
	pub comment_count_cursor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPostsResponse {
	pub posts: Vec<PostView>,
	pub previous_cursor: String,
	pub next_cursor: Option<String>,
	pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComment {
	pub id: String,
	pub post_id: String,
	pub created_at: i64,
}

impl From<&Comment> for CreatedComment {
	fn from(comment: &Comment) -> Self {
		Self {
			id: comment.id.to_hex(),
			post_id: comment.post_id.to_hex(),
			created_at: comment.created_at.timestamp_millis(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedComment {
	pub id: String,
	pub deleted_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
	pub url: String,
	pub image_path: String,
	/// Unix seconds.
	pub expires_at: i64,
}
