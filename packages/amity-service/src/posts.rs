use time::OffsetDateTime;
use uuid::Uuid;

use amity_storage::models::Post;

use crate::{AmityService, ServiceError, ServiceResult, graph::check_key};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreatePostRequest {
	/// Wall the post lives on.
	pub owner_key: String,
	pub author_key: String,
	pub content: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EditContentRequest {
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PostView {
	pub post_id: Uuid,
	pub owner_key: String,
	pub author_key: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	pub content: String,
}
impl From<Post> for PostView {
	fn from(row: Post) -> Self {
		Self {
			post_id: row.post_id,
			owner_key: row.owner_key,
			author_key: row.author_key,
			created_at: row.created_at,
			updated_at: row.updated_at,
			content: row.content,
		}
	}
}

pub(crate) fn check_content(content: &str) -> ServiceResult<&str> {
	let content = content.trim();

	if content.is_empty() {
		return Err(ServiceError::invalid("content must not be empty."));
	}

	Ok(content)
}

impl AmityService {
	pub async fn post_create(&self, req: CreatePostRequest) -> ServiceResult<PostView> {
		let owner_key = req.owner_key.trim();
		let author_key = req.author_key.trim();

		check_key("owner_key", owner_key)?;
		check_key("author_key", author_key)?;

		let content = check_content(&req.content)?;
		let row = self.store.insert_post(Uuid::new_v4(), owner_key, author_key, content).await?;

		tracing::info!(post_id = %row.post_id, owner_key, author_key, "Post created.");

		Ok(row.into())
	}

	pub async fn post_get(&self, post_id: Uuid) -> ServiceResult<PostView> {
		self.store
			.get_post(post_id)
			.await?
			.map(PostView::from)
			.ok_or_else(|| ServiceError::not_found(format!("post {post_id}")))
	}

	pub async fn post_edit(&self, post_id: Uuid, req: EditContentRequest) -> ServiceResult<PostView> {
		let content = check_content(&req.content)?;

		self.store
			.update_post_content(post_id, content)
			.await?
			.map(PostView::from)
			.ok_or_else(|| ServiceError::not_found(format!("post {post_id}")))
	}

	/// Deletes the post with its comments and reactions.
	pub async fn post_delete(&self, post_id: Uuid) -> ServiceResult<()> {
		if !self.store.delete_post(post_id).await? {
			return Err(ServiceError::not_found(format!("post {post_id}")));
		}

		tracing::info!(%post_id, "Post deleted.");

		Ok(())
	}
}
