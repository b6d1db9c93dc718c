//! Budgeted fallback across widening search tiers.
//!
//! The cascade walks `Recent -> Connections -> Global -> Done`. Each step admits the rows of one
//! tier, skipping keys admitted by an earlier tier, until the budget is spent or the tiers run
//! out. The caller owns the queries; the cascade owns the bookkeeping.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	/// Autocomplete while typing.
	Live,
	/// A full results page.
	Full,
}
impl SearchMode {
	pub fn budget(self, cfg: &amity_config::Search) -> usize {
		match self {
			Self::Live => cfg.live_budget as usize,
			Self::Full => cfg.full_budget as usize,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
	Recent,
	Connections,
	Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
	Recent,
	Connections,
	Global,
	Done,
}
impl CascadeState {
	pub fn tier(self) -> Option<Tier> {
		match self {
			Self::Recent => Some(Tier::Recent),
			Self::Connections => Some(Tier::Connections),
			Self::Global => Some(Tier::Global),
			Self::Done => None,
		}
	}

	fn next(self) -> Self {
		match self {
			Self::Recent => Self::Connections,
			Self::Connections => Self::Global,
			Self::Global | Self::Done => Self::Done,
		}
	}
}

#[derive(Debug)]
pub struct TierCascade<T> {
	state: CascadeState,
	budget: usize,
	admitted: Vec<(Tier, T)>,
	seen: HashSet<String>,
}
impl<T> TierCascade<T> {
	pub fn new(budget: usize) -> Self {
		let state = if budget == 0 { CascadeState::Done } else { CascadeState::Recent };

		Self { state, budget, admitted: Vec::new(), seen: HashSet::new() }
	}

	pub fn state(&self) -> CascadeState {
		self.state
	}

	pub fn is_done(&self) -> bool {
		self.state == CascadeState::Done
	}

	pub fn remaining(&self) -> usize {
		self.budget.saturating_sub(self.admitted.len())
	}

	pub fn len(&self) -> usize {
		self.admitted.len()
	}

	pub fn is_empty(&self) -> bool {
		self.admitted.is_empty()
	}

	/// Keys admitted so far, sorted so queries built from them are deterministic.
	pub fn excluded_keys(&self) -> Vec<String> {
		let mut keys = self.seen.iter().cloned().collect::<Vec<_>>();

		keys.sort();

		keys
	}

	/// Admits rows for the current tier and advances to the next state.
	///
	/// Rows whose key was already admitted are dropped, as are rows past the remaining budget.
	/// Returns the number of rows admitted. Does nothing once the cascade is done.
	pub fn admit<I, F>(&mut self, rows: I, key_of: F) -> usize
	where
		I: IntoIterator<Item = T>,
		F: Fn(&T) -> &str,
	{
		let Some(tier) = self.state.tier() else {
			return 0;
		};
		let mut count = 0;

		for row in rows {
			if self.remaining() == 0 {
				break;
			}
			if !self.seen.insert(key_of(&row).to_string()) {
				continue;
			}

			self.admitted.push((tier, row));

			count += 1;
		}

		self.advance();

		count
	}

	/// Moves past the current tier without admitting anything.
	pub fn skip(&mut self) {
		self.advance();
	}

	/// Stops the cascade, keeping what has been admitted.
	pub fn abandon(&mut self) {
		self.state = CascadeState::Done;
	}

	pub fn finish(self) -> Vec<(Tier, T)> {
		self.admitted
	}

	fn advance(&mut self) {
		self.state = if self.remaining() == 0 { CascadeState::Done } else { self.state.next() };
	}
}
