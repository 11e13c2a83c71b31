use std::sync::Arc;

use crate::{
	config::Config,
	dependencies::Dependency,
	services::{
		aggregate_folder::AggregateFolder, comment_service::CommentService, image_service::ImageService,
		post_service::PostService, response::ServiceError,
	},
};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
	pub posts: Arc<PostService>,
	pub comments: Arc<CommentService>,
	pub images: Arc<ImageService>,
}

pub struct Bootstrap;
impl Bootstrap {
	pub async fn app_state(config: &Config) -> Result<AppState, ServiceError> {
		let dependency = Dependency::from_config(config).await?;
		Ok(Self::wire(config, dependency))
	}

	pub fn wire(
		config: &Config,
		dependency: Dependency,
	) -> AppState {
		let images = Arc::new(ImageService::new(dependency.storage, config));
		let folder = AggregateFolder::new(dependency.posts.clone(), config.recent_comments_count);

		AppState {
			posts: Arc::new(PostService::new(
				dependency.posts.clone(),
				dependency.users.clone(),
				images.clone(),
				dependency.tasks.clone(),
			)),
			comments: Arc::new(CommentService::new(
				dependency.comments,
				dependency.posts,
				dependency.users,
				dependency.tasks,
				folder,
			)),
			images,
		}
	}
}
