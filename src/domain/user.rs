use serde::{Deserialize, Serialize};

use crate::domain::id::ObjectId;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct User {
	pub id: ObjectId,
	pub name: String,
}
