use axum::{extract::Request, middleware::Next, response::Response};

use crate::services::response::ServiceError;

pub const USER_ID_HEADER: &str = "userid";

/// Caller identity taken from the `userId` header. Not authenticated.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

pub async fn set_user_id_header(
	mut request: Request,
	next: Next,
) -> Result<Response, ServiceError> {
	let user_id = request
		.headers()
		.get(USER_ID_HEADER)
		.ok_or_else(|| {
			tracing::warn!(uri = %request.uri(), "request without userId header");
			ServiceError::InvalidRequest
		})?
		.to_str()
		.map_err(|_| ServiceError::InvalidRequest)?
		.to_owned();

	request.extensions_mut().insert(CurrentUser(user_id));
	Ok(next.run(request).await)
}
