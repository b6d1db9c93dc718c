use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
	/// Posts on or by any accepted connection of the viewer.
	Main,
	/// Posts on one profile's wall.
	Profile,
}

/// Exclusive upper bound for the next page.
///
/// Without `before_post_id` the bound is `created_at < before`. With it, posts sharing the
/// `before` timestamp are split by id so a page boundary never skips or repeats one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
	pub before: OffsetDateTime,
	pub before_post_id: Option<Uuid>,
}
impl FeedCursor {
	pub fn before(before: OffsetDateTime) -> Self {
		Self { before: to_store_precision(before), before_post_id: None }
	}

	pub fn after_item(created_at: OffsetDateTime, post_id: Uuid) -> Self {
		Self { before: to_store_precision(created_at), before_post_id: Some(post_id) }
	}

	pub fn admits(&self, created_at: OffsetDateTime, post_id: Uuid) -> bool {
		match self.before_post_id {
			None => created_at < self.before,
			Some(before_id) => (created_at, post_id) < (self.before, before_id),
		}
	}
}

/// Drops sub-microsecond digits. Post timestamps are stored at microsecond precision, so
/// every bound compared against them must be too.
pub fn to_store_precision(at: OffsetDateTime) -> OffsetDateTime {
	at.replace_nanosecond(at.nanosecond() / 1_000 * 1_000).unwrap_or(at)
}

/// Feed order: newest first, ties broken by descending id.
pub fn newest_first(
	a_created_at: OffsetDateTime,
	a_post_id: Uuid,
	b_created_at: OffsetDateTime,
	b_post_id: Uuid,
) -> Ordering {
	(b_created_at, b_post_id).cmp(&(a_created_at, a_post_id))
}
