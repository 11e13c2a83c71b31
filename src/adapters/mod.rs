pub mod object_storage;
pub mod repositories;
pub mod users;

/// Failure reported by an external collaborator: the database, object storage or user directory.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migration(#[from] sqlx::migrate::MigrateError),
	#[error("object storage error: {0}")]
	ObjectStorage(String),
	#[error("object not found: {0}")]
	ObjectNotFound(String),
	#[error("malformed {entity} row: {reason}")]
	Decode { entity: &'static str, reason: String },
}
