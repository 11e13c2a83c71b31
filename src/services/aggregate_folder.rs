use std::{sync::Arc, time::Duration};

use chrono::Utc;

use super::response::ServiceError;
use crate::{
	adapters::repositories::PostStore,
	domain::{
		id::ObjectId,
		post::{entity::Post, AggregateWrite, CommentChange},
	},
};

pub const FOLD_MAX_ATTEMPTS: usize = 10;
pub const FOLD_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Folds comment changes into the denormalized aggregate of their post.
///
/// Concurrent folds on the same post are serialized by the post's `version`:
/// a write based on a stale snapshot is rejected by the store and retried on a
/// fresh read after a fixed delay. Other failures abort at once.
#[derive(Clone)]
pub struct AggregateFolder {
	posts: Arc<dyn PostStore>,
	recent_comments_cap: usize,
	max_attempts: usize,
	retry_delay: Duration,
}

impl AggregateFolder {
	pub fn new(
		posts: Arc<dyn PostStore>,
		recent_comments_cap: usize,
	) -> Self {
		Self {
			posts,
			recent_comments_cap,
			max_attempts: FOLD_MAX_ATTEMPTS,
			retry_delay: FOLD_RETRY_DELAY,
		}
	}

	pub fn with_retry_policy(
		mut self,
		max_attempts: usize,
		retry_delay: Duration,
	) -> Self {
		self.max_attempts = max_attempts.max(1);
		self.retry_delay = retry_delay;
		self
	}

	/// `baseline` is used for the first attempt only. Pass `None` to read the
	/// current post instead.
	pub async fn fold(
		&self,
		post_id: ObjectId,
		change: CommentChange,
		mut baseline: Option<Post>,
	) -> Result<Post, ServiceError> {
		for attempt in 1..=self.max_attempts {
			let post = match baseline.take() {
				Some(post) => post,
				None => self.current(&post_id).await?,
			};

			let update = post.fold_comment(&change, self.recent_comments_cap, Utc::now());
			match self.posts.update_aggregate(&post_id, post.version, update).await? {
				AggregateWrite::Committed(post) => {
					tracing::debug!(
						post_id = %post_id,
						comment_id = %change.comment_id(),
						version = post.version,
						attempt,
						"folded comment into post"
					);
					return Ok(post);
				}
				AggregateWrite::VersionMismatch => {
					tracing::debug!(post_id = %post_id, expected_version = post.version, attempt, "post version moved on");
					if attempt < self.max_attempts {
						tokio::time::sleep(self.retry_delay).await;
					}
				}
			}
		}

		tracing::error!(
			post_id = %post_id,
			comment_id = %change.comment_id(),
			attempts = self.max_attempts,
			"gave up folding comment into post"
		);
		Err(ServiceError::VersionConflict)
	}

	async fn current(
		&self,
		post_id: &ObjectId,
	) -> Result<Post, ServiceError> {
		self.posts.find_by_id(post_id).await?.ok_or_else(|| {
			tracing::error!(post_id = %post_id, "post not found while folding comment");
			ServiceError::PostNotFound
		})
	}
}

#[cfg(test)]
mod test {
	use std::{
		sync::{
			atomic::{AtomicUsize, Ordering},
			Arc,
		},
		time::Duration,
	};

	use async_trait::async_trait;
	use chrono::Utc;

	use super::AggregateFolder;
	use crate::{
		adapters::{
			repositories::{MemoryRepository, PostStore},
			StorageError,
		},
		domain::{
			comment::entity::CommentSnapshot,
			id::ObjectId,
			post::{
				composite_key::composite_key,
				entity::{Post, PostState},
				query::PostQuery,
				AggregateUpdate, AggregateWrite, CommentChange,
			},
		},
		services::response::ServiceError,
	};

	fn post() -> Post {
		let id = ObjectId::new();
		let now = Utc::now();
		Post {
			id,
			content: "hello".into(),
			creator_id: ObjectId::new(),
			created_at: now,
			status: PostState::Posted,
			comment_count: 0,
			last_comment_at: None,
			original_image_path: String::new(),
			processed_image_path: String::new(),
			composite_key: composite_key(0, now, &id),
			recent_comments: vec![],
			version: 0,
		}
	}

	fn snapshot() -> CommentSnapshot {
		CommentSnapshot {
			id: ObjectId::new(),
			content: "first!".into(),
			creator_id: ObjectId::new(),
			creator_name: "Bob".into(),
			created_at: Utc::now(),
		}
	}

	/// Store whose conditional writes lose the race a fixed number of times.
	struct ContendedStore {
		inner: MemoryRepository<Post>,
		conflicts_left: AtomicUsize,
		writes: AtomicUsize,
		broken: bool,
	}

	impl ContendedStore {
		fn new(conflicts: usize) -> Self {
			Self {
				inner: MemoryRepository::new(),
				conflicts_left: AtomicUsize::new(conflicts),
				writes: AtomicUsize::new(0),
				broken: false,
			}
		}
	}

	#[async_trait]
	impl PostStore for ContendedStore {
		async fn insert(
			&self,
			post: Post,
		) -> Result<Post, StorageError> {
			self.inner.insert(post).await
		}

		async fn find_by_id(
			&self,
			id: &ObjectId,
		) -> Result<Option<Post>, StorageError> {
			self.inner.find_by_id(id).await
		}

		async fn update_aggregate(
			&self,
			id: &ObjectId,
			expected_version: i64,
			update: AggregateUpdate,
		) -> Result<AggregateWrite, StorageError> {
			self.writes.fetch_add(1, Ordering::SeqCst);
			if self.broken {
				return Err(StorageError::ObjectStorage("connection reset".into()));
			}
			let left = self.conflicts_left.load(Ordering::SeqCst);
			if left > 0 {
				self.conflicts_left.store(left - 1, Ordering::SeqCst);
				return Ok(AggregateWrite::VersionMismatch);
			}
			self.inner.update_aggregate(id, expected_version, update).await
		}

		async fn mark_posted(
			&self,
			id: &ObjectId,
			processed_image_path: &str,
		) -> Result<Option<Post>, StorageError> {
			self.inner.mark_posted(id, processed_image_path).await
		}

		async fn find_posts(
			&self,
			query: &PostQuery,
		) -> Result<Vec<Post>, StorageError> {
			self.inner.find_posts(query).await
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_version_conflicts_are_retried() {
		'_given: {
			let store = Arc::new(ContendedStore::new(9));
			let post = store.insert(post()).await.unwrap();
			let folder = AggregateFolder::new(store.clone(), 3);

			'_when: {
				let folded = folder.fold(post.id, CommentChange::Created(snapshot()), Some(post.clone())).await.unwrap();

				assert_eq!(folded.comment_count, 1);
				assert_eq!(folded.version, 1);
				assert_eq!(store.writes.load(Ordering::SeqCst), 10);
			}
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_gives_up_after_ten_attempts() {
		let store = Arc::new(ContendedStore::new(usize::MAX));
		let post = store.insert(post()).await.unwrap();
		let folder = AggregateFolder::new(store.clone(), 3);

		let started = tokio::time::Instant::now();
		let result = folder.fold(post.id, CommentChange::Created(snapshot()), None).await;

		assert!(matches!(result, Err(ServiceError::VersionConflict)));
		assert_eq!(store.writes.load(Ordering::SeqCst), 10);
		assert!(started.elapsed() >= Duration::from_millis(900));
		assert_eq!(store.find_by_id(&post.id).await.unwrap().unwrap().comment_count, 0);
	}

	#[tokio::test]
	async fn test_storage_failures_are_not_retried() {
		let mut store = ContendedStore::new(0);
		store.broken = true;
		let store = Arc::new(store);
		let post = store.insert(post()).await.unwrap();
		let folder = AggregateFolder::new(store.clone(), 3);

		let result = folder.fold(post.id, CommentChange::Deleted(ObjectId::new()), None).await;

		assert!(matches!(result, Err(ServiceError::InternalError)));
		assert_eq!(store.writes.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_missing_post_is_not_retried() {
		let store = Arc::new(ContendedStore::new(0));
		let folder = AggregateFolder::new(store.clone(), 3);

		let result = folder.fold(ObjectId::new(), CommentChange::Deleted(ObjectId::new()), None).await;

		assert!(matches!(result, Err(ServiceError::PostNotFound)));
		assert_eq!(store.writes.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_stale_baseline_is_refreshed() {
		'_given: {
			let store = Arc::new(MemoryRepository::<Post>::new());
			let stale = store.insert(post()).await.unwrap();
			let folder = AggregateFolder::new(store.clone(), 3).with_retry_policy(10, Duration::from_millis(1));
			folder.fold(stale.id, CommentChange::Created(snapshot()), None).await.unwrap();

			'_when: {
				let folded = folder.fold(stale.id, CommentChange::Created(snapshot()), Some(stale.clone())).await.unwrap();

				assert_eq!(folded.comment_count, 2);
				assert_eq!(folded.version, 2);
				assert_eq!(folded.recent_comments.len(), 2);
			}
		}
	}
}
