use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Extension, Json,
};

use super::rejected;
use crate::{
	bootstrap::AppState,
	common::middleware_custom_header::CurrentUser,
	domain::commands::{CreateComment, DeleteComment},
	services::response::{ServiceError, ServiceResponse},
};

pub async fn create_comment(
	State(state): State<AppState>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Path(post_id): Path<String>,
	body: Result<Json<CreateComment>, JsonRejection>,
) -> Result<ServiceResponse, ServiceError> {
	let Json(mut cmd) = body.map_err(rejected)?;
	cmd.user_id = user_id;
	cmd.post_id = post_id;
	Ok(state.comments.create_comment(cmd).await?.into())
}

pub async fn delete_comment(
	State(state): State<AppState>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<ServiceResponse, ServiceError> {
	let cmd = DeleteComment {
		user_id,
		post_id,
		comment_id,
	};
	Ok(state.comments.delete_comment(cmd).await?.into())
}
