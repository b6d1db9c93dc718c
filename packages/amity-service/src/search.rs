//! Tiered profile search.
//!
//! A query walks three tiers, each widening the candidate set: the viewer's own search history,
//! then accepted connections, then every profile. Each tier only fills what the earlier ones left
//! of the budget and never repeats a key.

use tokio::time::{self, Instant};

use amity_domain::{
	cascade::{SearchMode, Tier, TierCascade},
	term::SearchTerm,
};
use amity_storage::models::ProfileSummary;

use crate::{
	AmityService, ServiceError, ServiceResult,
	graph::check_key,
	history::SearchHistory,
	store::{ConnectionStore, HistoryStore, ProfileIndex},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub viewer: String,
	#[serde(default)]
	pub term: String,
	#[serde(default = "default_mode")]
	pub mode: SearchMode,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchHit {
	pub key: String,
	pub first_name: String,
	pub last_name: String,
	pub tier: Tier,
}
impl SearchHit {
	pub fn from_summary(tier: Tier, row: ProfileSummary) -> Self {
		Self { key: row.profile_key, first_name: row.first_name, last_name: row.last_name, tier }
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub items: Vec<SearchHit>,
}

pub struct TieredSearchEngine<'a, S>
where
	S: ?Sized,
{
	store: &'a S,
	cfg: &'a amity_config::Search,
}
impl<'a, S> TieredSearchEngine<'a, S>
where
	S: ?Sized + ConnectionStore + ProfileIndex + HistoryStore,
{
	pub fn new(store: &'a S, cfg: &'a amity_config::Search) -> Self {
		Self { store, cfg }
	}

	/// Runs the cascade for `viewer`.
	///
	/// Once `deadline` passes, remaining tiers are dropped and the hits gathered so far are
	/// returned. A failing tier query fails the whole search.
	pub async fn search(
		&self,
		viewer: &str,
		raw_term: &str,
		mode: SearchMode,
		deadline: Option<Instant>,
	) -> ServiceResult<Vec<SearchHit>> {
		check_key("viewer", viewer)?;

		let term = SearchTerm::parse(raw_term, self.cfg).map_err(ServiceError::bad_term)?;

		if term.is_empty() {
			let rows = SearchHistory::new(self.store)
				.recent(viewer, self.cfg.live_budget as usize)
				.await?;

			return Ok(rows.into_iter().map(|row| SearchHit::from_summary(Tier::Recent, row)).collect());
		}

		let mut cascade = TierCascade::new(mode.budget(self.cfg));

		while let Some(tier) = cascade.state().tier() {
			if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
				tracing::warn!(viewer, ?tier, admitted = cascade.len(), "Search deadline passed.");
				cascade.abandon();

				break;
			}

			let exclude = cascade.excluded_keys();
			let limit = cascade.remaining();
			let query = self.tier_rows(tier, viewer, &term, &exclude, limit);
			let rows = match deadline {
				Some(deadline) => match time::timeout_at(deadline, query).await {
					Ok(rows) => rows?,
					Err(_) => {
						tracing::warn!(
							viewer,
							?tier,
							admitted = cascade.len(),
							"Search deadline passed during tier query."
						);
						cascade.abandon();

						break;
					},
				},
				None => query.await?,
			};
			let admitted = cascade.admit(rows, |row| row.profile_key.as_str());

			tracing::debug!(viewer, ?tier, admitted, remaining = cascade.remaining(), "Tier done.");
		}

		let hits = cascade
			.finish()
			.into_iter()
			.map(|(tier, row)| SearchHit::from_summary(tier, row))
			.collect();

		Ok(hits)
	}

	async fn tier_rows(
		&self,
		tier: Tier,
		viewer: &str,
		term: &SearchTerm,
		exclude: &[String],
		limit: usize,
	) -> ServiceResult<Vec<ProfileSummary>> {
		match tier {
			Tier::Recent => self.store.recent_searches(viewer, Some(term), exclude, limit).await,
			Tier::Connections => {
				let neighbors = self.store.neighbor_keys(viewer).await?;

				if neighbors.is_empty() {
					return Ok(vec![]);
				}

				let mut exclude = exclude.to_vec();

				exclude.push(viewer.to_string());

				self.store.match_profiles(term, Some(&neighbors), &exclude, limit).await
			},
			Tier::Global => self.store.match_profiles(term, None, exclude, limit).await,
		}
	}
}

fn default_mode() -> SearchMode {
	SearchMode::Full
}

impl AmityService {
	pub async fn search(&self, req: SearchRequest) -> ServiceResult<SearchResponse> {
		let deadline = (self.cfg.search.deadline_ms > 0).then(|| {
			Instant::now() + std::time::Duration::from_millis(self.cfg.search.deadline_ms)
		});
		let items = TieredSearchEngine::new(self.store.as_ref(), &self.cfg.search)
			.search(req.viewer.trim(), &req.term, req.mode, deadline)
			.await?;

		Ok(SearchResponse { items })
	}
}
