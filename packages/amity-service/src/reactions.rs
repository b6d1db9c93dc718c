use time::OffsetDateTime;
use uuid::Uuid;

use amity_domain::reaction::ReactionTarget;
use amity_storage::models::Reaction;

use crate::{AmityService, ServiceError, ServiceResult, graph::check_key};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReactionRequest {
	pub author_key: String,
	pub target: ReactionTarget,
	pub is_like: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReactionKey {
	pub author_key: String,
	pub target: ReactionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReactionView {
	pub reaction_id: Uuid,
	pub author_key: String,
	pub target: ReactionTarget,
	pub is_like: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<Reaction> for ReactionView {
	type Error = ServiceError;

	fn try_from(row: Reaction) -> Result<Self, Self::Error> {
		let target = ReactionTarget::from_columns(row.post_id, row.comment_id).ok_or_else(|| {
			ServiceError::StoreUnavailable {
				message: format!("Reaction {} has no single target.", row.reaction_id),
			}
		})?;

		Ok(Self {
			reaction_id: row.reaction_id,
			author_key: row.author_key,
			target,
			is_like: row.is_like,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReactionsResponse {
	pub target: ReactionTarget,
	pub likes: usize,
	pub dislikes: usize,
	pub items: Vec<ReactionView>,
}

impl AmityService {
	/// One reaction per author and target; a second one is `Conflict`.
	pub async fn reaction_create(&self, req: ReactionRequest) -> ServiceResult<ReactionView> {
		let author_key = req.author_key.trim();

		check_key("author_key", author_key)?;

		let row =
			self.store.insert_reaction(Uuid::new_v4(), author_key, req.target, req.is_like).await?;

		tracing::debug!(author_key, target = ?req.target, is_like = req.is_like, "Reaction created.");

		row.try_into()
	}

	pub async fn reaction_modify(&self, req: ReactionRequest) -> ServiceResult<ReactionView> {
		let author_key = req.author_key.trim();

		check_key("author_key", author_key)?;

		let Some(row) = self.store.update_reaction(author_key, req.target, req.is_like).await?
		else {
			return Err(ServiceError::not_found(format!(
				"reaction by {author_key} on {:?}",
				req.target
			)));
		};

		row.try_into()
	}

	pub async fn reaction_delete(&self, req: ReactionKey) -> ServiceResult<()> {
		let author_key = req.author_key.trim();

		check_key("author_key", author_key)?;

		if !self.store.delete_reaction(author_key, req.target).await? {
			return Err(ServiceError::not_found(format!(
				"reaction by {author_key} on {:?}",
				req.target
			)));
		}

		Ok(())
	}

	pub async fn reactions_for_target(
		&self,
		target: ReactionTarget,
	) -> ServiceResult<ReactionsResponse> {
		let items = self
			.store
			.list_reactions_for_target(target)
			.await?
			.into_iter()
			.map(ReactionView::try_from)
			.collect::<ServiceResult<Vec<_>>>()?;
		let likes = items.iter().filter(|item| item.is_like).count();

		Ok(ReactionsResponse { target, likes, dislikes: items.len() - likes, items })
	}
}
