use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{comment::entity::CommentSnapshot, id::ObjectId};
use crate::services::response::ServiceError;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Post {
	pub id: ObjectId,
	pub content: String,
	pub creator_id: ObjectId,
	pub created_at: DateTime<Utc>,
	pub status: PostState,
	pub comment_count: i32,
	pub last_comment_at: Option<DateTime<Utc>>,
	pub original_image_path: String,
	pub processed_image_path: String,
	pub composite_key: String,
	pub recent_comments: Vec<CommentSnapshot>,
	pub version: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostState {
	/// Waiting for image processing; comments are rejected.
	#[default]
	Pending,
	Posted,
	/// Reserved; no flow writes it yet.
	Deleted,
}

impl PostState {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "PENDING",
			Self::Posted => "POSTED",
			Self::Deleted => "DELETED",
		}
	}
}

impl Display for PostState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PostState {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"PENDING" => Ok(Self::Pending),
			"POSTED" => Ok(Self::Posted),
			"DELETED" => Ok(Self::Deleted),
			_ => Err(ServiceError::InvalidRequest),
		}
	}
}
