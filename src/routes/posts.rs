use axum::{
	extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
	Extension, Json,
};

use super::rejected;
use crate::{
	bootstrap::AppState,
	common::middleware_custom_header::CurrentUser,
	domain::commands::{CreatePost, FetchPosts},
	services::response::{ServiceError, ServiceResponse},
};

pub async fn fetch_posts(
	State(state): State<AppState>,
	query: Result<Query<FetchPosts>, QueryRejection>,
) -> Result<ServiceResponse, ServiceError> {
	let Query(cmd) = query.map_err(rejected)?;
	Ok(state.posts.fetch_posts(cmd).await?.into())
}

pub async fn create_post(
	State(state): State<AppState>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	body: Result<Json<CreatePost>, JsonRejection>,
) -> Result<ServiceResponse, ServiceError> {
	let Json(mut cmd) = body.map_err(rejected)?;
	cmd.user_id = user_id;
	Ok(state.posts.create_post(cmd).await?.into())
}
