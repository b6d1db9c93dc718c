use serde::{Deserialize, Serialize};

/// An unordered pair of distinct profile keys held in canonical order.
///
/// `low` always sorts before `high`, so one pair maps to exactly one stored row no matter which
/// side names it first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionPair {
	low: String,
	high: String,
}
impl ConnectionPair {
	/// Returns `None` for a self-pair.
	pub fn new(a: &str, b: &str) -> Option<Self> {
		match a.cmp(b) {
			std::cmp::Ordering::Less => Some(Self { low: a.to_string(), high: b.to_string() }),
			std::cmp::Ordering::Greater => Some(Self { low: b.to_string(), high: a.to_string() }),
			std::cmp::Ordering::Equal => None,
		}
	}

	pub fn low(&self) -> &str {
		&self.low
	}

	pub fn high(&self) -> &str {
		&self.high
	}

	pub fn contains(&self, key: &str) -> bool {
		self.low == key || self.high == key
	}

	pub fn other(&self, key: &str) -> Option<&str> {
		if self.low == key {
			Some(&self.high)
		} else if self.high == key {
			Some(&self.low)
		} else {
			None
		}
	}

	/// Maps per-side descriptors given from `a`'s point of view onto `(low, high)`.
	pub fn orient<'a>(&self, a: &str, desc_a: &'a str, desc_b: &'a str) -> (&'a str, &'a str) {
		if self.low == a { (desc_a, desc_b) } else { (desc_b, desc_a) }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
	None,
	Pending { initiator: String },
	Accepted { initiator: String },
}
impl ConnectionStatus {
	pub fn exists(&self) -> bool {
		!matches!(self, Self::None)
	}

	pub fn accepted(&self) -> bool {
		matches!(self, Self::Accepted { .. })
	}

	pub fn initiator(&self) -> Option<&str> {
		match self {
			Self::None => None,
			Self::Pending { initiator } | Self::Accepted { initiator } => Some(initiator),
		}
	}
}
