use std::sync::Arc;

use crate::{
	adapters::{
		object_storage::{MemoryObjectStorage, ObjectStorage, S3ObjectStorage},
		repositories::{CommentStore, MemoryRepository, PostStore, Repository},
		users::{StaticUserDirectory, UserDirectory},
	},
	config::Config,
	database::connection_pool,
	domain::{comment::entity::Comment, post::entity::Post},
	services::{
		background::{TaskRunner, TokioTaskRunner},
		response::ServiceError,
	},
};

/// Collaborators injected into the services.
#[derive(Clone)]
pub struct Dependency {
	pub posts: Arc<dyn PostStore>,
	pub comments: Arc<dyn CommentStore>,
	pub users: Arc<dyn UserDirectory>,
	pub storage: Arc<dyn ObjectStorage>,
	pub tasks: Arc<dyn TaskRunner>,
}

impl Dependency {
	/// Postgres and S3 when configured, in-memory stand-ins otherwise.
	pub async fn from_config(config: &Config) -> Result<Self, ServiceError> {
		let (posts, comments) = match &config.database_url {
			Some(url) => {
				let pool = connection_pool(url, config.database_max_connections).await?;
				let posts: Arc<dyn PostStore> = Arc::new(Repository::<Post>::new(pool.clone()));
				let comments: Arc<dyn CommentStore> = Arc::new(Repository::<Comment>::new(pool));
				(posts, comments)
			}
			None => {
				tracing::warn!("DATABASE_URL is not set, posts and comments are kept in memory");
				let posts: Arc<dyn PostStore> = Arc::new(MemoryRepository::<Post>::new());
				let comments: Arc<dyn CommentStore> = Arc::new(MemoryRepository::<Comment>::new());
				(posts, comments)
			}
		};

		let storage: Arc<dyn ObjectStorage> = match &config.s3 {
			Some(settings) => Arc::new(S3ObjectStorage::connect(settings).await),
			None => {
				tracing::warn!("S3_BUCKET is not set, images are kept in memory");
				Arc::new(MemoryObjectStorage::new())
			}
		};

		Ok(Self {
			posts,
			comments,
			users: Arc::new(StaticUserDirectory::seeded()),
			storage,
			tasks: Arc::new(TokioTaskRunner::new()),
		})
	}
}
