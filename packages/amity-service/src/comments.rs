use time::OffsetDateTime;
use uuid::Uuid;

use amity_storage::models::Comment;

use crate::{
	AmityService, ServiceError, ServiceResult,
	graph::check_key,
	posts::{EditContentRequest, check_content},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateCommentRequest {
	pub post_id: Uuid,
	pub author_key: String,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommentView {
	pub comment_id: Uuid,
	pub post_id: Uuid,
	pub author_key: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	pub content: String,
}
impl From<Comment> for CommentView {
	fn from(row: Comment) -> Self {
		Self {
			comment_id: row.comment_id,
			post_id: row.post_id,
			author_key: row.author_key,
			created_at: row.created_at,
			updated_at: row.updated_at,
			content: row.content,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommentsResponse {
	pub post_id: Uuid,
	pub items: Vec<CommentView>,
}

impl AmityService {
	pub async fn comment_create(&self, req: CreateCommentRequest) -> ServiceResult<CommentView> {
		let author_key = req.author_key.trim();

		check_key("author_key", author_key)?;

		let content = check_content(&req.content)?;
		let row =
			self.store.insert_comment(Uuid::new_v4(), req.post_id, author_key, content).await?;

		tracing::info!(comment_id = %row.comment_id, post_id = %row.post_id, "Comment created.");

		Ok(row.into())
	}

	pub async fn comment_get(&self, comment_id: Uuid) -> ServiceResult<CommentView> {
		self.store
			.get_comment(comment_id)
			.await?
			.map(CommentView::from)
			.ok_or_else(|| ServiceError::not_found(format!("comment {comment_id}")))
	}

	pub async fn comment_edit(
		&self,
		comment_id: Uuid,
		req: EditContentRequest,
	) -> ServiceResult<CommentView> {
		let content = check_content(&req.content)?;

		self.store
			.update_comment_content(comment_id, content)
			.await?
			.map(CommentView::from)
			.ok_or_else(|| ServiceError::not_found(format!("comment {comment_id}")))
	}

	pub async fn comment_delete(&self, comment_id: Uuid) -> ServiceResult<()> {
		if !self.store.delete_comment(comment_id).await? {
			return Err(ServiceError::not_found(format!("comment {comment_id}")));
		}

		Ok(())
	}

	/// Comments on a post, oldest first. An unknown post is `NotFound`.
	pub async fn comments_for_post(&self, post_id: Uuid) -> ServiceResult<CommentsResponse> {
		if self.store.get_post(post_id).await?.is_none() {
			return Err(ServiceError::not_found(format!("post {post_id}")));
		}

		let items = self
			.store
			.list_comments_for_post(post_id)
			.await?
			.into_iter()
			.map(CommentView::from)
			.collect();

		Ok(CommentsResponse { post_id, items })
	}
}
