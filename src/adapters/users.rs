use std::collections::HashMap;

use async_trait::async_trait;

use super::StorageError;
use crate::domain::{id::ObjectId, user::User};

#[async_trait]
pub trait UserDirectory: Send + Sync {
	async fn get_user_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<User>, StorageError>;
}

/// Fixed set of users; there is no user management yet.
pub struct StaticUserDirectory {
	users: HashMap<ObjectId, User>,
}

impl StaticUserDirectory {
	pub fn new(users: impl IntoIterator<Item = User>) -> Self {
		Self {
			users: users.into_iter().map(|user| (user.id, user)).collect(),
		}
	}

	pub fn seeded() -> Self {
		Self::new([
			User {
				id: ObjectId::from_bytes([0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11]),
				name: "Alice".into(),
			},
			User {
				id: ObjectId::from_bytes([0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x12]),
				name: "Bob".into(),
			},
			User {
				id: ObjectId::from_bytes([0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x13]),
				name: "Charlie".into(),
			},
		])
	}
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
	async fn get_user_by_id(
		&self,
		id: &ObjectId,
	) -> Result<Option<User>, StorageError> {
		Ok(self.users.get(id).cloned())
	}
}
