pub mod comments;
pub mod feed;
pub mod graph;
pub mod history;
pub mod memory;
pub mod pg;
pub mod posts;
pub mod profiles;
pub mod reactions;
pub mod search;
pub mod store;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use comments::{CommentView, CommentsResponse, CreateCommentRequest};
pub use error::ServiceError;
pub use feed::{FeedAssembler, FeedItem, FeedRequest, FeedResponse, NextCursor};
pub use graph::{
	AcceptRequest, ConnectionGraph, ConnectionRequest, ConnectionView, FriendItem, FriendsResponse,
	PairRequest,
};
pub use history::{RecentRequest, SearchHistory, SubmitSearchRequest};
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use posts::{CreatePostRequest, EditContentRequest, PostView};
pub use profiles::{ExistsResponse, ProfileRequest, ProfileResponse};
pub use reactions::{ReactionKey, ReactionRequest, ReactionView, ReactionsResponse};
pub use search::{SearchHit, SearchRequest, SearchResponse, TieredSearchEngine};
pub use store::Store;

use amity_config::{Config, StorageBackend};
use amity_storage::db::Db;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct AmityService {
	pub cfg: Config,
	pub store: Arc<dyn Store>,
}
impl AmityService {
	pub fn new(cfg: Config, store: Arc<dyn Store>) -> Self {
		Self { cfg, store }
	}

	/// Opens the configured backend. Postgres gets its schema applied before first use.
	pub async fn connect(cfg: Config) -> ServiceResult<Self> {
		let store: Arc<dyn Store> = match cfg.storage.backend {
			StorageBackend::Memory => {
				tracing::warn!("Using the in-memory store; data is lost on shutdown.");

				Arc::new(MemoryStore::new())
			},
			StorageBackend::Postgres => {
				let Some(postgres) = cfg.storage.postgres.as_ref() else {
					return Err(ServiceError::invalid("storage.postgres is required."));
				};
				let db = Db::connect(postgres).await?;

				db.ensure_schema().await?;

				Arc::new(PgStore::new(db))
			},
		};

		Ok(Self::new(cfg, store))
	}
}
