//! In-process document collections used by tests and by the server when no
//! database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CommentStore, PostStore};
use crate::{
	adapters::StorageError,
	domain::{
		comment::entity::{Comment, CommentState},
		id::ObjectId,
		post::{
			entity::{Post, PostState},
			query::{OrderBy, PostQuery},
			AggregateUpdate, AggregateWrite,
		},
	},
};

pub struct MemoryRepository<E> {
	rows: RwLock<BTreeMap<ObjectId, E>>,
}

impl<E> Default for MemoryRepository<E> {
	fn default() -> Self {
		Self {
			rows: RwLock::new(BTreeMap::new()),
		}
	}
}

impl<E: Clone> MemoryRepository<E> {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn len(&self) -> usize {
		self.rows.read().await.len()
	}

	pub async fn all(&self) -> Vec<E> {
		self.rows.read().await.values().cloned().collect()
	}
}

#[async_trait]
impl PostStore for MemoryRepository<Post> {
	async fn insert(
		&self,
		post: Post,
	) -> Result<Post, StorageError> {
		self.rows.write().await.insert(post.id, post.clone());
		Ok(post)
	}

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Post>, StorageError> {
		Ok(self.rows.read().await.get(id).cloned())
	}

	async fn update_aggregate(
		&self,
		id: &ObjectId,
		expected_version: i64,
		update: AggregateUpdate,
	) -> Result<AggregateWrite, StorageError> {
		let mut rows = self.rows.write().await;
		match rows.get_mut(id) {
			Some(post) if post.version == expected_version => {
				post.apply(update);
				Ok(AggregateWrite::Committed(post.clone()))
			}
			_ => Ok(AggregateWrite::VersionMismatch),
		}
	}

	async fn mark_posted(
		&self,
		id: &ObjectId,
		processed_image_path: &str,
	) -> Result<Option<Post>, StorageError> {
		let mut rows = self.rows.write().await;
		Ok(rows.get_mut(id).map(|post| {
			post.processed_image_path = processed_image_path.to_string();
			post.status = PostState::Posted;
			post.clone()
		}))
	}

	async fn find_posts(
		&self,
		query: &PostQuery,
	) -> Result<Vec<Post>, StorageError> {
		let rows = self.rows.read().await;
		let mut posts: Vec<Post> = rows.values().rev().filter(|post| query.matches(post)).cloned().collect();
		if query.order_by == OrderBy::CommentCount {
			posts.sort_by(|a, b| b.composite_key.cmp(&a.composite_key));
		}
		posts.truncate(query.limit.max(0) as usize);
		Ok(posts)
	}
}

#[async_trait]
impl CommentStore for MemoryRepository<Comment> {
	async fn insert(
		&self,
		comment: Comment,
	) -> Result<Comment, StorageError> {
		self.rows.write().await.insert(comment.id, comment.clone());
		Ok(comment)
	}

	async fn find_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError> {
		Ok(self.rows.read().await.get(id).cloned())
	}

	async fn soft_delete(
		&self,
		id: &ObjectId,
	) -> Result<Option<Comment>, StorageError> {
		let mut rows = self.rows.write().await;
		Ok(rows.get_mut(id).filter(|comment| comment.status == CommentState::Posted).map(|comment| {
			comment.status = CommentState::Deleted;
			comment.clone()
		}))
	}
}
