use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a reaction points at. Exactly one target, never both, never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ReactionTarget {
	Post(Uuid),
	Comment(Uuid),
}
impl ReactionTarget {
	pub fn post_id(&self) -> Option<Uuid> {
		match self {
			Self::Post(id) => Some(*id),
			Self::Comment(_) => None,
		}
	}

	pub fn comment_id(&self) -> Option<Uuid> {
		match self {
			Self::Post(_) => None,
			Self::Comment(id) => Some(*id),
		}
	}

	/// Rebuilds a target from the two nullable reference columns.
	pub fn from_columns(post_id: Option<Uuid>, comment_id: Option<Uuid>) -> Option<Self> {
		match (post_id, comment_id) {
			(Some(id), None) => Some(Self::Post(id)),
			(None, Some(id)) => Some(Self::Comment(id)),
			_ => None,
		}
	}
}
