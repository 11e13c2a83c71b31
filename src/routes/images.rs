use axum::extract::{rejection::QueryRejection, Query, State};

use super::rejected;
use crate::{
	bootstrap::AppState,
	domain::commands::PresignUpload,
	services::response::{ServiceError, ServiceResponse},
};

pub async fn presign_upload(
	State(state): State<AppState>,
	query: Result<Query<PresignUpload>, QueryRejection>,
) -> Result<ServiceResponse, ServiceError> {
	let Query(cmd) = query.map_err(rejected)?;
	Ok(state.images.presigned_upload(&cmd.file_name, cmd.file_size).await?.into())
}
