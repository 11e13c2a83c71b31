pub mod composite_key;
pub mod entity;
pub mod query;

use chrono::{DateTime, Utc};

use self::{
	composite_key::composite_key,
	entity::{Post, PostState},
};
use crate::domain::{comment::entity::CommentSnapshot, id::ObjectId};

/// Comment event folded into a post's aggregate fields.
#[derive(Clone, Debug)]
pub enum CommentChange {
	Created(CommentSnapshot),
	Deleted(ObjectId),
}

impl CommentChange {
	pub fn comment_id(&self) -> ObjectId {
		match self {
			Self::Created(snapshot) => snapshot.id,
			Self::Deleted(id) => *id,
		}
	}
}

/// New values for the denormalized aggregate of a post.
///
/// Written together with `version + 1` in one conditional update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateUpdate {
	pub comment_count: i32,
	pub recent_comments: Vec<CommentSnapshot>,
	pub last_comment_at: Option<DateTime<Utc>>,
	pub composite_key: String,
}

/// Outcome of a conditional aggregate write.
#[derive(Debug)]
pub enum AggregateWrite {
	Committed(Post),
	/// No post matched both the id and the expected version.
	VersionMismatch,
}

impl Post {
	/// A fresh post. It stays `PENDING` until its image is processed; posts
	/// without an image are visible at once.
	pub fn new(
		creator_id: ObjectId,
		content: String,
		original_image_path: String,
	) -> Self {
		let id = ObjectId::new();
		let created_at = Utc::now();
		let status = if original_image_path.is_empty() { PostState::Posted } else { PostState::Pending };
		Self {
			id,
			content,
			creator_id,
			created_at,
			status,
			comment_count: 0,
			last_comment_at: None,
			original_image_path,
			processed_image_path: String::new(),
			composite_key: composite_key(0, created_at, &id),
			recent_comments: vec![],
			version: 0,
		}
	}

	/// Computes the aggregate that results from applying `change` on top of this snapshot.
	pub fn fold_comment(
		&self,
		change: &CommentChange,
		recent_comments_cap: usize,
		now: DateTime<Utc>,
	) -> AggregateUpdate {
		let (comment_count, recent_comments, last_comment_at) = match change {
			CommentChange::Created(snapshot) => {
				let mut recent: Vec<CommentSnapshot> = self.recent_comments_without(&snapshot.id);
				recent.push(snapshot.clone());
				recent.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
				recent.truncate(recent_comments_cap);
				(self.comment_count.saturating_add(1), recent, Some(now))
			}
			CommentChange::Deleted(comment_id) => {
				let mut count = self.comment_count - 1;
				if count < 0 {
					tracing::warn!(post_id = %self.id, comment_id = %comment_id, "comment count would go negative, clamping to zero");
					count = 0;
				}
				(count, self.recent_comments_without(comment_id), self.last_comment_at)
			}
		};

		AggregateUpdate {
			composite_key: composite_key(comment_count, now, &self.id),
			comment_count,
			recent_comments,
			last_comment_at,
		}
	}

	fn recent_comments_without(
		&self,
		comment_id: &ObjectId,
	) -> Vec<CommentSnapshot> {
		self.recent_comments.iter().filter(|c| &c.id != comment_id).cloned().collect()
	}

	pub fn apply(
		&mut self,
		update: AggregateUpdate,
	) {
		self.comment_count = update.comment_count;
		self.recent_comments = update.recent_comments;
		self.last_comment_at = update.last_comment_at;
		self.composite_key = update.composite_key;
		self.version += 1;
	}

	pub fn has_image(&self) -> bool {
		!self.original_image_path.is_empty()
	}
}

#[cfg(test)]
mod test {
	use chrono::{Duration, TimeZone, Utc};

	use super::{composite_key::composite_key, entity::PostState, CommentChange};
	use crate::domain::{comment::entity::CommentSnapshot, id::ObjectId, post::entity::Post};

	fn post() -> Post {
		let id = ObjectId::new();
		let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
		Post {
			id,
			content: "hello".into(),
			creator_id: ObjectId::new(),
			created_at,
			status: PostState::Posted,
			comment_count: 0,
			last_comment_at: None,
			original_image_path: String::new(),
			processed_image_path: String::new(),
			composite_key: composite_key(0, created_at, &id),
			recent_comments: vec![],
			version: 0,
		}
	}

	fn snapshot(seconds: i64) -> CommentSnapshot {
		CommentSnapshot {
			id: ObjectId::with_timestamp(seconds as u32),
			content: format!("comment at {seconds}"),
			creator_id: ObjectId::new(),
			creator_name: "Alice".into(),
			created_at: Utc.timestamp_opt(seconds, 0).unwrap(),
		}
	}

	#[test]
	fn test_created_comment_is_prepended_and_capped() {
		'_given: {
			let mut post = post();
			let now = Utc::now();
			let comments: Vec<_> = (0..4).map(|i| snapshot(1_700_000_100 + i)).collect();

			'_when: {
				for comment in &comments {
					let update = post.fold_comment(&CommentChange::Created(comment.clone()), 3, now);
					post.apply(update);
				}
			}

			assert_eq!(post.comment_count, 4);
			assert_eq!(post.version, 4);
			assert_eq!(post.last_comment_at, Some(now));
			let ids: Vec<_> = post.recent_comments.iter().map(|c| c.id).collect();
			assert_eq!(ids, vec![comments[3].id, comments[2].id, comments[1].id]);
			assert_eq!(post.composite_key, composite_key(4, now, &post.id));
		}
	}

	#[test]
	fn test_late_fold_of_older_comment_keeps_recency_order() {
		let post = {
			let mut post = post();
			let newer = snapshot(1_700_000_200);
			let update = post.fold_comment(&CommentChange::Created(newer), 3, Utc::now());
			post.apply(update);
			post
		};
		let older = snapshot(1_700_000_100);

		let update = post.fold_comment(&CommentChange::Created(older.clone()), 3, Utc::now());

		assert_eq!(update.recent_comments.len(), 2);
		assert_eq!(update.recent_comments[1].id, older.id);
	}

	#[test]
	fn test_refolding_same_comment_replaces_its_snapshot() {
		let mut post = post();
		let comment = snapshot(1_700_000_100);
		post.recent_comments = vec![comment.clone()];
		post.comment_count = 1;

		let update = post.fold_comment(&CommentChange::Created(comment.clone()), 3, Utc::now());

		assert_eq!(update.recent_comments, vec![comment]);
	}

	#[test]
	fn test_deleted_comment_keeps_last_comment_time() {
		'_given: {
			let mut post = post();
			let comment = snapshot(1_700_000_100);
			let commented_at = Utc::now() - Duration::minutes(5);
			let update = post.fold_comment(&CommentChange::Created(comment.clone()), 3, commented_at);
			post.apply(update);

			'_when: {
				let now = Utc::now();
				let update = post.fold_comment(&CommentChange::Deleted(comment.id), 3, now);

				assert_eq!(update.comment_count, 0);
				assert!(update.recent_comments.is_empty());
				assert_eq!(update.last_comment_at, Some(commented_at));
				assert_eq!(update.composite_key, composite_key(0, now, &post.id));
			}
		}
	}

	#[test]
	fn test_new_post_waits_for_its_image() {
		let with_image = Post::new(ObjectId::new(), "look".into(), "original/a.png".into());
		assert_eq!(with_image.status, PostState::Pending);
		assert!(with_image.has_image());

		let text_only = Post::new(ObjectId::new(), "hi".into(), String::new());
		assert_eq!(text_only.status, PostState::Posted);
		assert_eq!(text_only.composite_key, composite_key(0, text_only.created_at, &text_only.id));
		assert_eq!(text_only.version, 0);
	}

	#[test]
	fn test_delete_never_goes_negative() {
		let post = post();
		let update = post.fold_comment(&CommentChange::Deleted(ObjectId::new()), 3, Utc::now());
		assert_eq!(update.comment_count, 0);
	}
}
