mod comments;
mod images;
mod posts;

use std::fmt::Display;

use axum::{
	middleware,
	routing::{delete, get, post},
	Router,
};

use crate::{bootstrap::AppState, common::middleware_custom_header::set_user_id_header, services::response::ServiceError};

/// Feed API, relative to the service prefix.
pub fn create_routes(state: AppState) -> Router {
	Router::new()
		.route("/posts", get(posts::fetch_posts).post(posts::create_post))
		.route("/posts/:post_id/comments", post(comments::create_comment))
		.route("/posts/:post_id/comments/:comment_id", delete(comments::delete_comment))
		.route("/images/presign", get(images::presign_upload))
		.route_layer(middleware::from_fn(set_user_id_header))
		.with_state(state)
}

fn rejected(rejection: impl Display) -> ServiceError {
	tracing::warn!(%rejection, "malformed request");
	ServiceError::InvalidRequest
}

#[cfg(test)]
mod test {
	use axum::{
		body::Body,
		http::{Method, Request, StatusCode},
		Router,
	};
	use serde_json::{json, Value};
	use tower::ServiceExt;

	use super::create_routes;
	use crate::test_support::{TestContext, ALICE, BOB};

	fn request(
		method: Method,
		uri: &str,
		user_id: Option<&str>,
		body: Option<Value>,
	) -> Request<Body> {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(user_id) = user_id {
			builder = builder.header("userId", user_id);
		}
		match body {
			Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())).unwrap(),
			None => builder.body(Body::empty()).unwrap(),
		}
	}

	async fn call(
		app: &Router,
		request: Request<Body>,
	) -> (StatusCode, Value) {
		let response = app.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		(status, serde_json::from_slice(&body).unwrap())
	}

	#[tokio::test]
	async fn test_missing_user_header_is_rejected() {
		let context = TestContext::new();
		let app = create_routes(context.app_state());

		let (status, body) = call(&app, request(Method::GET, "/posts", None, None)).await;

		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["code"], 1004);
	}

	#[tokio::test]
	async fn test_post_and_comment_flow() {
		'_given: {
			let context = TestContext::new();
			let app = create_routes(context.app_state());

			'_when: {
				let (status, created) =
					call(&app, request(Method::POST, "/posts", Some(ALICE), Some(json!({ "content": "hello" })))).await;
				assert_eq!(status, StatusCode::OK);
				assert_eq!(created["code"], 0);
				assert_eq!(created["message"], "success");
				let post_id = created["data"]["id"].as_str().unwrap().to_string();

				let (status, comment) = call(
					&app,
					request(Method::POST, &format!("/posts/{post_id}/comments"), Some(BOB), Some(json!({ "content": "hi" }))),
				)
				.await;
				assert_eq!(status, StatusCode::OK);
				assert_eq!(comment["data"]["postId"], post_id.as_str());
				context.tasks.wait_idle().await;

				let (status, listed) = call(&app, request(Method::GET, "/posts?limit=5&orderBy=comment_count", Some(BOB), None)).await;
				assert_eq!(status, StatusCode::OK);
				let first = &listed["data"]["posts"][0];
				assert_eq!(first["commentCount"], 1);
				assert_eq!(first["creatorName"], "Alice");
				assert_eq!(first["recentComments"][0]["creatorName"], "Bob");
				assert_eq!(first["imageURL"], "");
				assert_eq!(listed["data"]["hasMore"], false);

				let comment_id = comment["data"]["id"].as_str().unwrap();
				let uri = format!("/posts/{post_id}/comments/{comment_id}");
				let (status, denied) = call(&app, request(Method::DELETE, &uri, Some(ALICE), None)).await;
				assert_eq!(status, StatusCode::BAD_REQUEST);
				assert_eq!(denied["code"], 3101);

				let (status, deleted) = call(&app, request(Method::DELETE, &uri, Some(BOB), None)).await;
				assert_eq!(status, StatusCode::OK);
				assert_eq!(deleted["data"]["id"], comment_id);
			}
		}
	}

	#[tokio::test]
	async fn test_engagement_cursor_is_echoed_verbatim() {
		'_given: {
			let context = TestContext::new();
			let app = create_routes(context.app_state());
			let mut created = Vec::new();
			for content in ["one", "two", "three"] {
				let (_, body) = call(&app, request(Method::POST, "/posts", Some(ALICE), Some(json!({ "content": content })))).await;
				created.push(body["data"]["id"].as_str().unwrap().to_string());
			}

			'_when: {
				let mut seen = Vec::new();
				let mut has_more = Vec::new();
				let mut uri = "/posts?limit=1&orderBy=comment_count".to_string();
				loop {
					let (status, listed) = call(&app, request(Method::GET, &uri, Some(BOB), None)).await;
					assert_eq!(status, StatusCode::OK);
					for post in listed["data"]["posts"].as_array().unwrap() {
						seen.push(post["id"].as_str().unwrap().to_string());
					}
					has_more.push(listed["data"]["hasMore"].as_bool().unwrap());
					if !listed["data"]["hasMore"].as_bool().unwrap() {
						break;
					}
					let cursor = listed["data"]["nextCursor"].as_str().unwrap();
					uri = format!("/posts?limit=1&orderBy=comment_count&previousCursor={cursor}");
				}

				assert_eq!(has_more, vec![true, true, false]);
				seen.sort();
				created.sort();
				assert_eq!(seen, created);
			}
		}
	}

	#[tokio::test]
	async fn test_error_envelopes() {
		let context = TestContext::new();
		let app = create_routes(context.app_state());

		let missing_post = format!("/posts/{}/comments", "5f0000000000000000000000");
		let (status, body) = call(&app, request(Method::POST, &missing_post, Some(BOB), Some(json!({ "content": "hi" })))).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body, json!({ "code": 3300, "message": "Post not found" }));

		let (status, body) = call(
			&app,
			request(Method::POST, "/posts", Some(ALICE), Some(json!({ "content": "pic", "imageFilePath": "original/x.jpg" }))),
		)
		.await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["code"], 3001);

		let (status, body) = call(&app, request(Method::POST, "/posts", Some(ALICE), Some(json!({ "text": "wrong" })))).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["code"], 1004);

		let (status, body) = call(&app, request(Method::GET, "/posts?limit=0", Some(ALICE), None)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["code"], 1004);
	}

	#[tokio::test]
	async fn test_presign_route() {
		let context = TestContext::new();
		let app = create_routes(context.app_state());

		let (status, body) =
			call(&app, request(Method::GET, "/images/presign?fileName=cat.png&fileSize=512", Some(ALICE), None)).await;
		assert_eq!(status, StatusCode::OK);
		assert!(body["data"]["imagePath"].as_str().unwrap().starts_with("original/"));
		assert!(body["data"]["expiresAt"].as_i64().unwrap() > 0);

		let (status, body) =
			call(&app, request(Method::GET, "/images/presign?fileName=cat.gif&fileSize=512", Some(ALICE), None)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["code"], 3005);
	}
}
