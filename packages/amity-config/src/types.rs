use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub feed: Feed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub backend: StorageBackend,
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	Postgres,
	Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Result budget for autocomplete-style lookups.
	#[serde(default = "default_live_budget")]
	pub live_budget: u32,
	/// Result budget for a full results page.
	#[serde(default = "default_full_budget")]
	pub full_budget: u32,
	/// Separator between alternative tokens of a raw search term.
	#[serde(default = "default_term_delimiter")]
	pub term_delimiter: String,
	#[serde(default = "default_max_term_chars")]
	pub max_term_chars: usize,
	#[serde(default = "default_max_terms")]
	pub max_terms: usize,
	/// Overall deadline for one tier cascade. Zero disables the deadline.
	#[serde(default = "default_deadline_ms")]
	pub deadline_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			live_budget: default_live_budget(),
			full_budget: default_full_budget(),
			term_delimiter: default_term_delimiter(),
			max_term_chars: default_max_term_chars(),
			max_terms: default_max_terms(),
			deadline_ms: default_deadline_ms(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
	#[serde(default = "default_page_size")]
	pub page_size: u32,
}
impl Default for Feed {
	fn default() -> Self {
		Self { page_size: default_page_size() }
	}
}

fn default_live_budget() -> u32 {
	5
}

fn default_full_budget() -> u32 {
	50
}

fn default_term_delimiter() -> String {
	"+".to_string()
}

fn default_max_term_chars() -> usize {
	256
}

fn default_max_terms() -> usize {
	16
}

fn default_deadline_ms() -> u64 {
	2_000
}

fn default_page_size() -> u32 {
	20
}
