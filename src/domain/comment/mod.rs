pub mod entity;

use self::entity::{Comment, CommentState};
use crate::domain::id::ObjectId;

impl Comment {
	/// Only the author may delete, and only while the comment is still visible.
	pub fn deletable_by(
		&self,
		user_id: &ObjectId,
	) -> bool {
		if self.status != CommentState::Posted {
			tracing::warn!(comment_id = %self.id, status = %self.status, "comment is not in a deletable state");
			return false;
		}
		if &self.creator_id != user_id {
			tracing::warn!(comment_id = %self.id, user_id = %user_id, "user is not the author of the comment");
			return false;
		}
		true
	}
}
