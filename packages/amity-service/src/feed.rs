//! Reverse-chronological feeds with keyset pagination.

use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

use amity_domain::feed::{FeedCursor, FeedMode};
use amity_storage::models::{Post, PostScope};

use crate::{
	AmityService, ServiceError, ServiceResult,
	graph::{ConnectionGraph, check_key},
	store::{ConnectionStore, ContentStore},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedRequest {
	pub target: String,
	pub mode: FeedMode,
	#[serde(default, with = "crate::time_serde::option")]
	pub before: Option<OffsetDateTime>,
	#[serde(default)]
	pub before_post_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeedItem {
	pub post_id: Uuid,
	pub owner_key: String,
	pub author_key: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub content: String,
}
impl From<Post> for FeedItem {
	fn from(post: Post) -> Self {
		Self {
			post_id: post.post_id,
			owner_key: post.owner_key,
			author_key: post.author_key,
			created_at: post.created_at,
			content: post.content,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NextCursor {
	#[serde(with = "crate::time_serde")]
	pub before: OffsetDateTime,
	pub before_post_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedResponse {
	pub items: Vec<FeedItem>,
	/// Absent once a page comes back short.
	pub next_cursor: Option<NextCursor>,
}

pub struct FeedAssembler<'a, S>
where
	S: ?Sized,
{
	store: &'a S,
	page_size: usize,
}
impl<'a, S> FeedAssembler<'a, S>
where
	S: ?Sized + ConnectionStore + ContentStore,
{
	pub fn new(store: &'a S, page_size: usize) -> Self {
		Self { store, page_size }
	}

	/// One page of the feed, newest first, strictly below `cursor`.
	pub async fn fetch(
		&self,
		target: &str,
		mode: FeedMode,
		cursor: Option<FeedCursor>,
	) -> ServiceResult<Vec<Post>> {
		check_key("target", target)?;

		let rows = match mode {
			FeedMode::Main => {
				let neighbors = ConnectionGraph::new(self.store).neighbors(target).await?;

				if neighbors.is_empty() {
					tracing::debug!(profile_key = target, "Feed has no neighbours.");

					return Ok(vec![]);
				}

				self.store
					.list_posts_page(
						PostScope::OwnerOrAuthorIn(&neighbors),
						cursor.as_ref(),
						self.page_size,
					)
					.await?
			},
			FeedMode::Profile =>
				self.store
					.list_posts_page(PostScope::Owner(target), cursor.as_ref(), self.page_size)
					.await?,
		};
		let mut seen = HashSet::new();
		let mut page = rows.into_iter().filter(|post| seen.insert(post.post_id)).collect::<Vec<_>>();

		page.truncate(self.page_size);

		Ok(page)
	}
}

impl AmityService {
	pub async fn feed(&self, req: FeedRequest) -> ServiceResult<FeedResponse> {
		let cursor = match (req.before, req.before_post_id) {
			(None, None) => None,
			(Some(before), None) => Some(FeedCursor::before(before)),
			(Some(before), Some(post_id)) => Some(FeedCursor::after_item(before, post_id)),
			(None, Some(_)) =>
				return Err(ServiceError::invalid("before_post_id requires before.")),
		};
		let page_size = self.cfg.feed.page_size as usize;
		let posts = FeedAssembler::new(self.store.as_ref(), page_size)
			.fetch(req.target.trim(), req.mode, cursor)
			.await?;
		let next_cursor = match posts.last() {
			Some(last) if posts.len() == page_size =>
				Some(NextCursor { before: last.created_at, before_post_id: last.post_id }),
			_ => None,
		};
		let items = posts.into_iter().map(FeedItem::from).collect();

		Ok(FeedResponse { items, next_cursor })
	}
}
