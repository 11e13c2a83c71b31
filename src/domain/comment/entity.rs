use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::ObjectId;
use crate::services::response::ServiceError;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Comment {
	pub id: ObjectId,
	pub post_id: ObjectId,
	pub content: String,
	pub status: CommentState,
	pub creator_id: ObjectId,
	/// Copied from the user at creation time and never refreshed.
	pub creator_name: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentState {
	#[default]
	Posted,
	Deleted,
}

impl CommentState {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Posted => "POSTED",
			Self::Deleted => "DELETED",
		}
	}
}

impl Display for CommentState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for CommentState {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"POSTED" => Ok(Self::Posted),
			"DELETED" => Ok(Self::Deleted),
			_ => Err(ServiceError::InvalidRequest),
		}
	}
}

/// Denormalized copy of a comment kept in `Post::recent_comments`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommentSnapshot {
	pub id: ObjectId,
	pub content: String,
	pub creator_id: ObjectId,
	pub creator_name: String,
	pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentSnapshot {
	fn from(comment: &Comment) -> Self {
		Self {
			id: comment.id,
			content: comment.content.clone(),
			creator_id: comment.creator_id,
			creator_name: comment.creator_name.clone(),
			created_at: comment.created_at,
		}
	}
}
