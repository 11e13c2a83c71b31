use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{decode_id, CommentStore, Repository};
use crate::{
	adapters::StorageError,
	domain::{
		comment::entity::{Comment, CommentState},
		id::ObjectId,
	},
};

const COMMENT_COLUMNS: &str = "id, post_id, content, status, creator_id, creator_name, created_at";

#[derive(FromRow)]
struct CommentRow {
	id: Vec<u8>,
	post_id: Vec<u8>,
	content: String,
	status: String,
	creator_id: Vec<u8>,
	creator_name: String,
	created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
	type Error = StorageError;

	fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
		Ok(Comment {
			id: decode_id("comment", &row.id)?,
			post_id: decode_id("comment", &row.post_id)?,
			content: row.content,
			status: row.status.parse::<CommentState>().map_err(|_| StorageError::Decode {
				entity: "comment",
				reason: format!("unknown status {}", row.status),
			})?,
			creator_id: decode_id("comment", &row.creator_id)?,
			creator_name: row.creator_name,
			created_at: row.created_at,
		})
	}
}

#[async_trait]
impl CommentStore for Repository<Comment> {
	async fn insert(
		&self,
		comment: Comment,
	) -> Result<Comment, StorageError> {
		let row = sqlx::query_as::<_, CommentRow>(&format!(
			r#"
			INSERT INTO comments ({COMMENT_COLUMNS})
			VALUES ($1, $2, $3, $4, $5, $6, $7)
			RETURNING {COMMENT_COLUMNS}
			"#
		))
		.bind(comment.id.bytes().to_vec())
		.bind(comment.post_id.bytes().to_vec())
		.bind(&comment.content)
		.bind(comment.status.as_str())
		.bind(comment.creator_id.bytes().to_vec())
		.bind(&comment.creator_name)
		.bind(comment.created_at)
		.fetch_one(&self.pool)
		.await?;

		row.try_into()
	}

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError> {
		let row = sqlx::query_as::<_, CommentRow>(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"))
			.bind(id.bytes().to_vec())
			.fetch_optional(&self.pool)
			.await?;

		row.map(Comment::try_from).transpose()
	}

	async fn soft_delete(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError> {
		let row = sqlx::query_as::<_, CommentRow>(&format!(
			r#"
			UPDATE comments
			SET status = $1
			WHERE id = $2 AND status = $3
			RETURNING {COMMENT_COLUMNS}
			"#
		))
		.bind(CommentState::Deleted.as_str())
		.bind(id.bytes().to_vec())
		.bind(CommentState::Posted.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(Comment::try_from).transpose()
	}
}
