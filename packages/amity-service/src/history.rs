use amity_domain::cascade::Tier;
use amity_storage::models::ProfileSummary;

use crate::{
	AmityService, ServiceResult,
	graph::check_key,
	search::{SearchHit, SearchResponse},
	store::HistoryStore,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitSearchRequest {
	pub viewer: String,
	pub result_key: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecentRequest {
	pub viewer: String,
	/// Defaults to the live budget; capped at the full budget.
	pub limit: Option<u32>,
}

/// Append-only log of which profiles a viewer opened from search results.
pub struct SearchHistory<'a, S>
where
	S: ?Sized,
{
	store: &'a S,
}
impl<'a, S> SearchHistory<'a, S>
where
	S: ?Sized + HistoryStore,
{
	pub fn new(store: &'a S) -> Self {
		Self { store }
	}

	pub async fn record(&self, viewer: &str, result_key: &str) -> ServiceResult<()> {
		check_key("viewer", viewer)?;
		check_key("result_key", result_key)?;

		self.store.insert_search(viewer, result_key).await?;

		tracing::debug!(viewer, result_key, "Search recorded.");

		Ok(())
	}

	/// Most recently searched distinct profiles, newest first.
	pub async fn recent(&self, viewer: &str, limit: usize) -> ServiceResult<Vec<ProfileSummary>> {
		check_key("viewer", viewer)?;

		self.store.recent_searches(viewer, None, &[], limit).await
	}
}

impl AmityService {
	pub async fn search_submit(&self, req: SubmitSearchRequest) -> ServiceResult<()> {
		SearchHistory::new(self.store.as_ref()).record(req.viewer.trim(), req.result_key.trim()).await
	}

	pub async fn search_recent(&self, req: RecentRequest) -> ServiceResult<SearchResponse> {
		let search = &self.cfg.search;
		let limit = req.limit.unwrap_or(search.live_budget).min(search.full_budget) as usize;
		let rows = SearchHistory::new(self.store.as_ref()).recent(req.viewer.trim(), limit).await?;
		let items = rows.into_iter().map(|row| SearchHit::from_summary(Tier::Recent, row)).collect();

		Ok(SearchResponse { items })
	}
}
