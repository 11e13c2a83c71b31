use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, Postgres, QueryBuilder};

use super::{decode_id, PostStore, Repository};
use crate::{
	adapters::StorageError,
	domain::{
		comment::entity::CommentSnapshot,
		id::ObjectId,
		post::{
			entity::{Post, PostState},
			query::{OrderBy, PostCursor, PostQuery},
			AggregateUpdate, AggregateWrite,
		},
	},
};

const POST_COLUMNS: &str = "id, content, creator_id, created_at, status, comment_count, last_comment_at, \
	original_image_path, processed_image_path, composite_key, recent_comments, version";

#[derive(FromRow)]
struct PostRow {
	id: Vec<u8>,
	content: String,
	creator_id: Vec<u8>,
	created_at: DateTime<Utc>,
	status: String,
	comment_count: i32,
	last_comment_at: Option<DateTime<Utc>>,
	original_image_path: String,
	processed_image_path: String,
	composite_key: String,
	recent_comments: Json<Vec<CommentSnapshot>>,
	version: i64,
}

impl TryFrom<PostRow> for Post {
	type Error = StorageError;

	fn try_from(row: PostRow) -> Result<Self, Self::Error> {
		Ok(Post {
			id: decode_id("post", &row.id)?,
			content: row.content,
			creator_id: decode_id("post", &row.creator_id)?,
			created_at: row.created_at,
			status: row.status.parse::<PostState>().map_err(|_| StorageError::Decode {
				entity: "post",
				reason: format!("unknown status {}", row.status),
			})?,
			comment_count: row.comment_count,
			last_comment_at: row.last_comment_at,
			original_image_path: row.original_image_path,
			processed_image_path: row.processed_image_path,
			composite_key: row.composite_key,
			recent_comments: row.recent_comments.0,
			version: row.version,
		})
	}
}

fn sort_column(order_by: OrderBy) -> &'static str {
	match order_by {
		OrderBy::PostId => "id",
		OrderBy::CommentCount => "composite_key",
	}
}

#[async_trait]
impl PostStore for Repository<Post> {
	async fn insert(
		&self,
		post: Post,
	) -> Result<Post, StorageError> {
		let row = sqlx::query_as::<_, PostRow>(&format!(
			r#"
			INSERT INTO posts ({POST_COLUMNS})
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
			RETURNING {POST_COLUMNS}
			"#
		))
		.bind(post.id.bytes().to_vec())
		.bind(&post.content)
		.bind(post.creator_id.bytes().to_vec())
		.bind(post.created_at)
		.bind(post.status.as_str())
		.bind(post.comment_count)
		.bind(post.last_comment_at)
		.bind(&post.original_image_path)
		.bind(&post.processed_image_path)
		.bind(&post.composite_key)
		.bind(Json(&post.recent_comments))
		.bind(post.version)
		.fetch_one(&self.pool)
		.await?;

		row.try_into()
	}

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Post>, StorageError> {
		let row = sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
			.bind(id.bytes().to_vec())
			.fetch_optional(&self.pool)
			.await?;

		row.map(Post::try_from).transpose()
	}

	async fn update_aggregate(
		&self,
		id: &ObjectId,
		expected_version: i64,
		update: AggregateUpdate,
	) -> Result<AggregateWrite, StorageError> {
		let row = sqlx::query_as::<_, PostRow>(&format!(
			r#"
			UPDATE posts
			SET comment_count = $1, recent_comments = $2, last_comment_at = $3, composite_key = $4, version = version + 1
			WHERE id = $5 AND version = $6
			RETURNING {POST_COLUMNS}
			"#
		))
		.bind(update.comment_count)
		.bind(Json(&update.recent_comments))
		.bind(update.last_comment_at)
		.bind(&update.composite_key)
		.bind(id.bytes().to_vec())
		.bind(expected_version)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => Ok(AggregateWrite::Committed(row.try_into()?)),
			None => Ok(AggregateWrite::VersionMismatch),
		}
	}

	async fn mark_posted(
		&self,
		id: &ObjectId,
		processed_image_path: &str,
	) -> Result<Option<Post>, StorageError> {
		let row = sqlx::query_as::<_, PostRow>(&format!(
			r#"
			UPDATE posts
			SET processed_image_path = $1, status = $2
			WHERE id = $3
			RETURNING {POST_COLUMNS}
			"#
		))
		.bind(processed_image_path)
		.bind(PostState::Posted.as_str())
		.bind(id.bytes().to_vec())
		.fetch_optional(&self.pool)
		.await?;

		row.map(Post::try_from).transpose()
	}

	async fn find_posts(
		&self,
		query: &PostQuery,
	) -> Result<Vec<Post>, StorageError> {
		let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE status = "));
		builder.push_bind(query.status.as_str());

		match &query.before {
			Some(PostCursor::PostId(id)) => {
				builder.push(" AND id < ").push_bind(id.bytes().to_vec());
			}
			Some(PostCursor::CompositeKey(key)) => {
				builder.push(" AND composite_key < ").push_bind(key.clone());
			}
			None => {}
		}

		builder
			.push(format!(" ORDER BY {} DESC LIMIT ", sort_column(query.order_by)))
			.push_bind(query.limit);

		let rows = builder.build_query_as::<PostRow>().fetch_all(&self.pool).await?;
		tracing::debug!(order_by = ?query.order_by, fetched = rows.len(), limit = query.limit, "fetched posts");

		rows.into_iter().map(Post::try_from).collect()
	}
}
