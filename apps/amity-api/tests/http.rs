use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use amity_api::{routes, state::AppState};
use amity_config::{Config, Feed, Search, Service, Storage, StorageBackend};

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { backend: StorageBackend::Memory, postgres: None },
		search: Search::default(),
		feed: Feed::default(),
	}
}

async fn test_app() -> Router {
	let state = AppState::new(test_config()).await.expect("Failed to initialize app state.");

	routes::router(state)
}

async fn call(app: &Router, method: &str, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match payload {
		Some(payload) => builder
			.header("content-type", "application/json")
			.body(Body::from(payload.to_string())),
		None => builder.body(Body::empty()),
	}
	.expect("Failed to build request.");
	let response = app.clone().oneshot(request).await.expect("Failed to call the router.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body must be JSON.")
	};

	(status, value)
}

async fn create_profile(app: &Router, key: &str, first_name: &str) {
	let (status, body) = call(
		app,
		"POST",
		"/v1/profiles",
		Some(json!({
			"profile_key": key,
			"first_name": first_name,
			"last_name": "Doe",
			"email": format!("{key}@example.com"),
		})),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED, "Unexpected body: {body}");
}

async fn befriend(app: &Router, from: &str, to: &str) {
	let (status, _) = call(
		app,
		"POST",
		"/v1/connections/request",
		Some(json!({ "from": from, "to": to, "from_descriptor": "friend" })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);

	let (status, _) = call(
		app,
		"POST",
		"/v1/connections/accept",
		Some(json!({ "acceptor": to, "requester": from })),
	)
	.await;

	assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn health_ok() {
	let app = test_app().await;
	let (status, _) = call(&app, "GET", "/health", None).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_ranks_connections_before_strangers() {
	let app = test_app().await;

	for (key, first_name) in [("alice", "Alice"), ("bob", "Bob"), ("bobby", "Bobby")] {
		create_profile(&app, key, first_name).await;
	}

	befriend(&app, "alice", "bob").await;

	let (status, body) = call(
		&app,
		"POST",
		"/v1/search",
		Some(json!({ "viewer": "alice", "term": "bo", "mode": "full" })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body["items"],
		json!([
			{ "key": "bob", "first_name": "Bob", "last_name": "Doe", "tier": "connections" },
			{ "key": "bobby", "first_name": "Bobby", "last_name": "Doe", "tier": "global" },
		])
	);

	let (status, _) = call(
		&app,
		"POST",
		"/v1/search/submit",
		Some(json!({ "viewer": "alice", "result_key": "bobby" })),
	)
	.await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, body) =
		call(&app, "POST", "/v1/search/recent", Some(json!({ "viewer": "alice" }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["items"][0]["key"], "bobby");
	assert_eq!(body["items"][0]["tier"], "recent");
}

#[tokio::test]
async fn service_errors_map_to_status_codes() {
	let app = test_app().await;

	create_profile(&app, "alice", "Alice").await;

	let (status, body) = call(&app, "GET", "/v1/profiles/ghost", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error_code"], "not_found");

	let (status, body) = call(
		&app,
		"POST",
		"/v1/profiles",
		Some(json!({ "profile_key": "alice", "first_name": "Again" })),
	)
	.await;

	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error_code"], "conflict");

	let (status, body) = call(
		&app,
		"POST",
		"/v1/search",
		Some(json!({ "viewer": "alice", "term": "bo\u{0007}" })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_input");

	let (status, body) = call(
		&app,
		"POST",
		"/v1/connections/accept",
		Some(json!({ "acceptor": "alice", "requester": "alice" })),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error_code"], "invalid_input");
}

#[tokio::test]
async fn feed_and_friends_follow_the_graph() {
	let app = test_app().await;

	for (key, first_name) in [("alice", "Alice"), ("bob", "Bob")] {
		create_profile(&app, key, first_name).await;
	}

	befriend(&app, "alice", "bob").await;

	for content in ["first", "second"] {
		let (status, _) = call(
			&app,
			"POST",
			"/v1/posts",
			Some(json!({ "owner_key": "bob", "author_key": "bob", "content": content })),
		)
		.await;

		assert_eq!(status, StatusCode::CREATED);
	}

	let (status, body) =
		call(&app, "POST", "/v1/feed", Some(json!({ "target": "alice", "mode": "main" }))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["items"][0]["content"], "second");
	assert_eq!(body["items"][1]["content"], "first");
	assert_eq!(body["next_cursor"], Value::Null);

	let (status, body) = call(&app, "GET", "/v1/profiles/alice/friends", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["friends"][0]["profile_key"], "bob");

	let (status, body) = call(
		&app,
		"POST",
		"/v1/connections/status",
		Some(json!({ "a": "bob", "b": "alice" })),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "state": "accepted", "initiator": "alice" }));
}

#[tokio::test]
async fn post_comments_and_reactions_round_trip_over_http() {
	let app = test_app().await;

	create_profile(&app, "alice", "Alice").await;

	let (_, post) = call(
		&app,
		"POST",
		"/v1/posts",
		Some(json!({ "owner_key": "alice", "author_key": "alice", "content": "hello" })),
	)
	.await;
	let post_id = post["post_id"].as_str().expect("post_id must be a string.").to_string();
	let (status, _) = call(
		&app,
		"POST",
		"/v1/comments",
		Some(json!({ "post_id": post_id, "author_key": "alice", "content": "me too" })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);

	let (status, body) = call(&app, "GET", &format!("/v1/posts/{post_id}/comments"), None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["items"][0]["content"], "me too");

	let target = json!({ "kind": "post", "id": post_id });
	let (status, _) = call(
		&app,
		"POST",
		"/v1/reactions",
		Some(json!({ "author_key": "alice", "target": target, "is_like": true })),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);

	let (status, body) = call(&app, "POST", "/v1/reactions/list", Some(target.clone())).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["likes"], 1);

	let (status, _) = call(&app, "DELETE", &format!("/v1/posts/{post_id}"), None).await;

	assert_eq!(status, StatusCode::NO_CONTENT);

	let (status, _) = call(&app, "GET", &format!("/v1/posts/{post_id}"), None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}
