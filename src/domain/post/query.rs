use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{Post, PostState};
use crate::domain::id::ObjectId;
use crate::services::response::ServiceError;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
	#[default]
	PostId,
	CommentCount,
}

impl FromStr for OrderBy {
	type Err = ServiceError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"" | "post_id" => Ok(Self::PostId),
			"comment_count" => Ok(Self::CommentCount),
			_ => Err(ServiceError::InvalidRequest),
		}
	}
}

/// Exclusive upper bound of the next page. Only valid for the ordering that produced it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PostCursor {
	PostId(ObjectId),
	CompositeKey(String),
}

/// Filter, sort and limit for listing posts, newest or most engaged first.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PostQuery {
	pub status: PostState,
	pub order_by: OrderBy,
	pub before: Option<PostCursor>,
	/// Rows to fetch, one more than the page size.
	pub limit: i64,
}

impl PostQuery {
	pub fn page(
		order_by: OrderBy,
		previous_cursor: Option<&str>,
		page_size: i64,
	) -> Result<Self, ServiceError> {
		if page_size <= 0 {
			return Err(ServiceError::InvalidRequest);
		}
		let limit = page_size.checked_add(1).ok_or(ServiceError::InvalidRequest)?;

		let before = match previous_cursor.filter(|cursor| !cursor.is_empty()) {
			None => None,
			Some(cursor) => Some(match order_by {
				OrderBy::PostId => PostCursor::PostId(cursor.parse()?),
				OrderBy::CommentCount => PostCursor::CompositeKey(cursor.to_string()),
			}),
		};

		Ok(Self {
			status: PostState::Posted,
			order_by,
			before,
			limit,
		})
	}

	pub fn page_size(&self) -> usize {
		(self.limit - 1) as usize
	}

	/// Whether `post` passes the filter, ignoring sort and limit.
	pub fn matches(
		&self,
		post: &Post,
	) -> bool {
		if post.status != self.status {
			return false;
		}
		match &self.before {
			None => true,
			Some(PostCursor::PostId(id)) => post.id < *id,
			Some(PostCursor::CompositeKey(key)) => post.composite_key.as_str() < key.as_str(),
		}
	}
}

#[derive(Debug, Default)]
pub struct PostPage {
	pub posts: Vec<Post>,
	pub has_more: bool,
}

impl PostPage {
	/// Trims a result fetched with one extra row down to `page_size`.
	pub fn from_overfetch(
		mut posts: Vec<Post>,
		page_size: usize,
	) -> Self {
		let has_more = posts.len() > page_size;
		posts.truncate(page_size);
		Self { posts, has_more }
	}

	pub fn next_cursor(
		&self,
		order_by: OrderBy,
	) -> Option<String> {
		self.posts.last().map(|post| post.cursor(order_by))
	}
}

impl Post {
	pub fn cursor(
		&self,
		order_by: OrderBy,
	) -> String {
		match order_by {
			OrderBy::PostId => self.id.to_hex(),
			OrderBy::CommentCount => self.composite_key.clone(),
		}
	}
}
