use std::{collections::HashMap, sync::Arc};

use futures::FutureExt;

use super::{
	background::TaskRunner,
	image_service::{image_id, ImageService},
	response::ServiceError,
	schemas::{CommentView, CreatedPost, FetchPostsResponse, PostView},
};
use crate::{
	adapters::{repositories::PostStore, users::UserDirectory},
	domain::{
		commands::{validate_content, CreatePost, FetchPosts},
		id::ObjectId,
		post::{
			entity::Post,
			query::{OrderBy, PostPage, PostQuery},
		},
	},
};

pub struct PostService {
	posts: Arc<dyn PostStore>,
	users: Arc<dyn UserDirectory>,
	images: Arc<ImageService>,
	tasks: Arc<dyn TaskRunner>,
}

impl PostService {
	pub fn new(
		posts: Arc<dyn PostStore>,
		users: Arc<dyn UserDirectory>,
		images: Arc<ImageService>,
		tasks: Arc<dyn TaskRunner>,
	) -> Self {
		Self { posts, users, images, tasks }
	}

	pub async fn create_post(
		&self,
		cmd: CreatePost,
	) -> Result<CreatedPost, ServiceError> {
		let user_id: ObjectId = cmd.user_id.parse()?;
		let user = self.users.get_user_by_id(&user_id).await?.ok_or_else(|| {
			tracing::warn!(user_id = %user_id, "post author does not exist");
			ServiceError::UserNotFound
		})?;
		validate_content(&cmd.content)?;

		let original_image_path = cmd.image_file_path.unwrap_or_default();
		if !original_image_path.is_empty() && !self.images.raw_image_exists(&original_image_path).await? {
			tracing::warn!(image_path = %original_image_path, "post refers to an image that was never uploaded");
			return Err(ServiceError::ImageNotFound);
		}

		let post = self.posts.insert(Post::new(user.id, cmd.content, original_image_path)).await?;
		tracing::info!(post_id = %post.id, status = %post.status, "post created");

		if post.has_image() {
			self.schedule_image_processing(&post);
		}
		Ok(CreatedPost::from(&post))
	}

	/// Processes the raw upload off the request path, then publishes the post.
	/// On failure the post stays `PENDING`.
	fn schedule_image_processing(
		&self,
		post: &Post,
	) {
		let posts = self.posts.clone();
		let images = self.images.clone();
		let post_id = post.id;
		let original_image_path = post.original_image_path.clone();

		self.tasks.run(
			"ResizeImageTask",
			async move {
				let processed_image_path = images.resize_and_upload(&original_image_path).await?;
				match posts.mark_posted(&post_id, &processed_image_path).await? {
					Some(post) => {
						tracing::info!(post_id = %post.id, image_path = %post.processed_image_path, "post published");
						Ok(())
					}
					None => {
						tracing::error!(post_id = %post_id, "post disappeared before its image was processed");
						Err(ServiceError::PostNotFound)
					}
				}
			}
			.boxed(),
		);
	}

	pub async fn fetch_posts(
		&self,
		cmd: FetchPosts,
	) -> Result<FetchPostsResponse, ServiceError> {
		let order_by: OrderBy = cmd.order_by.as_deref().unwrap_or_default().parse()?;
		let query = PostQuery::page(order_by, cmd.previous_cursor.as_deref(), cmd.limit)?;
		let page = PostPage::from_overfetch(self.posts.find_posts(&query).await?, query.page_size());

		let mut creator_names: HashMap<ObjectId, String> = HashMap::new();
		let mut posts = Vec::with_capacity(page.posts.len());
		for post in &page.posts {
			let creator_name = match creator_names.get(&post.creator_id) {
				Some(name) => name.clone(),
				None => {
					let name = self.creator_name(&post.creator_id).await?;
					creator_names.insert(post.creator_id, name.clone());
					name
				}
			};
			posts.push(self.view(post, creator_name));
		}

		Ok(FetchPostsResponse {
			posts,
			previous_cursor: cmd.previous_cursor.unwrap_or_default(),
			next_cursor: page.next_cursor(order_by),
			has_more: page.has_more,
		})
	}

	async fn creator_name(
		&self,
		creator_id: &ObjectId,
	) -> Result<String, ServiceError> {
		match self.users.get_user_by_id(creator_id).await? {
			Some(user) => Ok(user.name),
			None => {
				tracing::error!(user_id = %creator_id, "post creator is missing from the user directory");
				Err(ServiceError::UserNotFound)
			}
		}
	}

	fn view(
		&self,
		post: &Post,
		creator_name: String,
	) -> PostView {
		PostView {
			id: post.id.to_hex(),
			created_at: post.created_at.timestamp_millis(),
			content: post.content.clone(),
			comment_count: post.comment_count,
			recent_comments: post.recent_comments.iter().map(CommentView::from).collect(),
			recent_commented_at: post.last_comment_at.map(|at| at.timestamp_millis()).unwrap_or(0),
			creator_id: post.creator_id.to_hex(),
			creator_name,
			image_id: image_id(&post.processed_image_path),
			image_url: self.images.public_url(&post.processed_image_path),
			comment_count_cursor: post.composite_key.clone(),
		}
	}
}
