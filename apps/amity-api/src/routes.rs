use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use uuid::Uuid;

use amity_domain::{connection::ConnectionStatus, reaction::ReactionTarget};
use amity_service::{
	AcceptRequest, CommentView, CommentsResponse, ConnectionRequest, ConnectionView,
	CreateCommentRequest, CreatePostRequest, EditContentRequest, ExistsResponse, FeedRequest,
	FeedResponse, FriendsResponse, PairRequest, PostView, ProfileRequest, ProfileResponse,
	ReactionKey, ReactionRequest, ReactionView, ReactionsResponse, RecentRequest, SearchRequest,
	SearchResponse, ServiceError, SubmitSearchRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/submit", post(search_submit))
		.route("/v1/search/recent", post(search_recent))
		.route("/v1/feed", post(feed))
		.route("/v1/connections/request", post(connection_request))
		.route("/v1/connections/accept", post(connection_accept))
		.route("/v1/connections/delete", post(connection_delete))
		.route("/v1/connections/modify", post(connection_modify))
		.route("/v1/connections/status", post(connection_status))
		.route("/v1/profiles", post(profile_create))
		.route(
			"/v1/profiles/{profile_key}",
			get(profile_get).put(profile_update).delete(profile_delete),
		)
		.route("/v1/profiles/{profile_key}/exists", get(profile_exists))
		.route("/v1/profiles/{profile_key}/friends", get(friends))
		.route("/v1/posts", post(post_create))
		.route("/v1/posts/{post_id}", get(post_get).put(post_edit).delete(post_delete))
		.route("/v1/posts/{post_id}/comments", get(comments_for_post))
		.route("/v1/comments", post(comment_create))
		.route(
			"/v1/comments/{comment_id}",
			get(comment_get).put(comment_edit).delete(comment_delete),
		)
		.route(
			"/v1/reactions",
			post(reaction_create).put(reaction_modify).delete(reaction_delete),
		)
		.route("/v1/reactions/list", post(reactions_for_target))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn search_submit(
	State(state): State<AppState>,
	Json(payload): Json<SubmitSearchRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.search_submit(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn search_recent(
	State(state): State<AppState>,
	Json(payload): Json<RecentRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search_recent(payload).await?;

	Ok(Json(response))
}

async fn feed(
	State(state): State<AppState>,
	Json(payload): Json<FeedRequest>,
) -> Result<Json<FeedResponse>, ApiError> {
	let response = state.service.feed(payload).await?;

	Ok(Json(response))
}

async fn connection_request(
	State(state): State<AppState>,
	Json(payload): Json<ConnectionRequest>,
) -> Result<(StatusCode, Json<ConnectionView>), ApiError> {
	let response = state.service.connection_request(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn connection_accept(
	State(state): State<AppState>,
	Json(payload): Json<AcceptRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.connection_accept(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn connection_delete(
	State(state): State<AppState>,
	Json(payload): Json<PairRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.connection_delete(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn connection_modify(
	State(state): State<AppState>,
	Json(payload): Json<ConnectionRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.connection_modify(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn connection_status(
	State(state): State<AppState>,
	Json(payload): Json<PairRequest>,
) -> Result<Json<ConnectionStatus>, ApiError> {
	let response = state.service.connection_status(payload).await?;

	Ok(Json(response))
}

async fn friends(
	State(state): State<AppState>,
	Path(profile_key): Path<String>,
) -> Result<Json<FriendsResponse>, ApiError> {
	let response = state.service.friends(&profile_key).await?;

	Ok(Json(response))
}

async fn profile_create(
	State(state): State<AppState>,
	Json(payload): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
	let response = state.service.profile_create(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn profile_get(
	State(state): State<AppState>,
	Path(profile_key): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
	let response = state.service.profile_get(&profile_key).await?;

	Ok(Json(response))
}

async fn profile_update(
	State(state): State<AppState>,
	Path(profile_key): Path<String>,
	Json(mut payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
	payload.profile_key = profile_key;

	let response = state.service.profile_update(payload).await?;

	Ok(Json(response))
}

async fn profile_delete(
	State(state): State<AppState>,
	Path(profile_key): Path<String>,
) -> Result<StatusCode, ApiError> {
	state.service.profile_delete(&profile_key).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn profile_exists(
	State(state): State<AppState>,
	Path(profile_key): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
	let response = state.service.profile_exists(&profile_key).await?;

	Ok(Json(response))
}

async fn post_create(
	State(state): State<AppState>,
	Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
	let response = state.service.post_create(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn post_get(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<PostView>, ApiError> {
	let response = state.service.post_get(post_id).await?;

	Ok(Json(response))
}

async fn post_edit(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
	Json(payload): Json<EditContentRequest>,
) -> Result<Json<PostView>, ApiError> {
	let response = state.service.post_edit(post_id, payload).await?;

	Ok(Json(response))
}

async fn post_delete(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.post_delete(post_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn comments_for_post(
	State(state): State<AppState>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<CommentsResponse>, ApiError> {
	let response = state.service.comments_for_post(post_id).await?;

	Ok(Json(response))
}

async fn comment_create(
	State(state): State<AppState>,
	Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
	let response = state.service.comment_create(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn comment_get(
	State(state): State<AppState>,
	Path(comment_id): Path<Uuid>,
) -> Result<Json<CommentView>, ApiError> {
	let response = state.service.comment_get(comment_id).await?;

	Ok(Json(response))
}

async fn comment_edit(
	State(state): State<AppState>,
	Path(comment_id): Path<Uuid>,
	Json(payload): Json<EditContentRequest>,
) -> Result<Json<CommentView>, ApiError> {
	let response = state.service.comment_edit(comment_id, payload).await?;

	Ok(Json(response))
}

async fn comment_delete(
	State(state): State<AppState>,
	Path(comment_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.comment_delete(comment_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn reaction_create(
	State(state): State<AppState>,
	Json(payload): Json<ReactionRequest>,
) -> Result<(StatusCode, Json<ReactionView>), ApiError> {
	let response = state.service.reaction_create(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn reaction_modify(
	State(state): State<AppState>,
	Json(payload): Json<ReactionRequest>,
) -> Result<Json<ReactionView>, ApiError> {
	let response = state.service.reaction_modify(payload).await?;

	Ok(Json(response))
}

async fn reaction_delete(
	State(state): State<AppState>,
	Json(payload): Json<ReactionKey>,
) -> Result<StatusCode, ApiError> {
	state.service.reaction_delete(payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn reactions_for_target(
	State(state): State<AppState>,
	Json(target): Json<ReactionTarget>,
) -> Result<Json<ReactionsResponse>, ApiError> {
	let response = state.service.reactions_for_target(target).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidInput { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_input", message),
			ServiceError::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Conflict { message } =>
				ApiError::new(StatusCode::CONFLICT, "conflict", message),
			ServiceError::StoreUnavailable { message } => {
				tracing::error!(error = %message, "Store request failed.");

				ApiError::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"store_unavailable",
					"Store is unavailable.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
