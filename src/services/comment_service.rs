use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;

use super::{
	aggregate_folder::AggregateFolder,
	background::TaskRunner,
	response::ServiceError,
	schemas::{CreatedComment, DeletedComment},
};
use crate::{
	adapters::{
		repositories::{CommentStore, PostStore},
		users::UserDirectory,
	},
	domain::{
		commands::{validate_content, CreateComment, DeleteComment},
		comment::entity::{Comment, CommentSnapshot, CommentState},
		id::ObjectId,
		post::{
			entity::{Post, PostState},
			CommentChange,
		},
	},
};

/// Writes comments and schedules the fold of each change into its post.
pub struct CommentService {
	comments: Arc<dyn CommentStore>,
	posts: Arc<dyn PostStore>,
	users: Arc<dyn UserDirectory>,
	tasks: Arc<dyn TaskRunner>,
	folder: AggregateFolder,
}

impl CommentService {
	pub fn new(
		comments: Arc<dyn CommentStore>,
		posts: Arc<dyn PostStore>,
		users: Arc<dyn UserDirectory>,
		tasks: Arc<dyn TaskRunner>,
		folder: AggregateFolder,
	) -> Self {
		Self {
			comments,
			posts,
			users,
			tasks,
			folder,
		}
	}

	pub async fn create_comment(
		&self,
		cmd: CreateComment,
	) -> Result<CreatedComment, ServiceError> {
		let user_id: ObjectId = cmd.user_id.parse()?;
		let post_id: ObjectId = cmd.post_id.parse()?;
		validate_content(&cmd.content)?;

		let user = match self.users.get_user_by_id(&user_id).await {
			Ok(Some(user)) => user,
			Ok(None) => {
				tracing::error!(user_id = %user_id, "commenting user does not exist");
				return Err(ServiceError::InternalError);
			}
			Err(err) => return Err(err.into()),
		};

		let post = self.posts.find_by_id(&post_id).await?.ok_or(ServiceError::PostNotFound)?;
		if post.status != PostState::Posted {
			tracing::warn!(post_id = %post.id, status = %post.status, "post does not accept comments");
			return Err(ServiceError::CommentNotAllowed);
		}

		let comment = self
			.comments
			.insert(Comment {
				id: ObjectId::new(),
				post_id,
				content: cmd.content,
				status: CommentState::Posted,
				creator_id: user.id,
				creator_name: user.name,
				created_at: Utc::now(),
			})
			.await?;
		tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");

		self.schedule_fold(post_id, CommentChange::Created(CommentSnapshot::from(&comment)), Some(post));
		Ok(CreatedComment::from(&comment))
	}

	/// The post is taken from the stored comment; the route's post id only has to be well formed.
	pub async fn delete_comment(
		&self,
		cmd: DeleteComment,
	) -> Result<DeletedComment, ServiceError> {
		let user_id: ObjectId = cmd.user_id.parse()?;
		let _: ObjectId = cmd.post_id.parse()?;
		let comment_id: ObjectId = cmd.comment_id.parse()?;

		let comment = self.comments.find_by_id(&comment_id).await?.ok_or(ServiceError::CommentNotFound)?;
		if !comment.deletable_by(&user_id) {
			return Err(ServiceError::CommentOperationNotAllowed);
		}

		// Another request may have deleted it since the read above.
		let deleted = self.comments.soft_delete(&comment_id).await?.ok_or_else(|| {
			tracing::warn!(comment_id = %comment_id, "comment was deleted concurrently");
			ServiceError::CommentOperationNotAllowed
		})?;
		let deleted_at = Utc::now();
		tracing::info!(comment_id = %deleted.id, post_id = %deleted.post_id, "comment deleted");

		self.schedule_fold(deleted.post_id, CommentChange::Deleted(deleted.id), None);
		Ok(DeletedComment {
			id: deleted.id.to_hex(),
			deleted_at: deleted_at.timestamp_millis(),
		})
	}

	fn schedule_fold(
		&self,
		post_id: ObjectId,
		change: CommentChange,
		baseline: Option<Post>,
	) {
		let folder = self.folder.clone();
		self.tasks.run(
			"UpdatePostComments",
			async move { folder.fold(post_id, change, baseline).await.map(|_| ()) }.boxed(),
		);
	}
}
