pub(crate) mod comment_repository;
pub mod memory;
pub(crate) mod post_repository;

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use super::StorageError;
use crate::domain::{
	comment::entity::Comment,
	id::ObjectId,
	post::{entity::Post, query::PostQuery, AggregateUpdate, AggregateWrite},
};

pub use memory::MemoryRepository;

/// Durable storage of post documents.
#[async_trait]
pub trait PostStore: Send + Sync {
	async fn insert(
		&self,
		post: Post,
	) -> Result<Post, StorageError>;

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Post>, StorageError>;

	/// Writes the aggregate fields and bumps `version` only while the stored
	/// version still equals `expected_version`. Filter and write are one
	/// atomic operation.
	async fn update_aggregate(
		&self,
		id: &ObjectId,
		expected_version: i64,
		update: AggregateUpdate,
	) -> Result<AggregateWrite, StorageError>;

	/// Records the processed image and makes the post visible.
	async fn mark_posted(
		&self,
		id: &ObjectId,
		processed_image_path: &str,
	) -> Result<Option<Post>, StorageError>;

	async fn find_posts(
		&self,
		query: &PostQuery,
	) -> Result<Vec<Post>, StorageError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
	async fn insert(
		&self,
		comment: Comment,
	) -> Result<Comment, StorageError>;

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError>;

	/// Moves a POSTED comment to DELETED and returns the updated row.
	/// `None` when no POSTED comment has this id.
	async fn soft_delete(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError>;
}

/// Postgres-backed repository, one per stored entity.
pub struct Repository<E> {
	pub pool: PgPool,
	pub _phantom: PhantomData<E>,
}

impl<E> Repository<E> {
	pub fn new(pool: PgPool) -> Self {
		Self {
			pool,
			_phantom: Default::default(),
		}
	}
}

impl<E> Clone for Repository<E> {
	fn clone(&self) -> Self {
		Self::new(self.pool.clone())
	}
}

fn decode_id(
	entity: &'static str,
	bytes: &[u8],
) -> Result<ObjectId, StorageError> {
	ObjectId::from_slice(bytes).ok_or_else(|| StorageError::Decode {
		entity,
		reason: format!("id has {} bytes", bytes.len()),
	})
}
