mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Feed, Postgres, Search, Service, Storage, StorageBackend};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	match (cfg.storage.backend, cfg.storage.postgres.as_ref()) {
		(StorageBackend::Postgres, None) => {
			return Err(Error::Validation {
				message: "storage.postgres is required when storage.backend is postgres."
					.to_string(),
			});
		},
		(StorageBackend::Postgres, Some(postgres)) => {
			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		(StorageBackend::Memory, _) => {},
	}

	if cfg.search.live_budget == 0 {
		return Err(Error::Validation {
			message: "search.live_budget must be greater than zero.".to_string(),
		});
	}
	if cfg.search.full_budget < cfg.search.live_budget {
		return Err(Error::Validation {
			message: "search.full_budget must be at least search.live_budget.".to_string(),
		});
	}
	if cfg.search.term_delimiter.is_empty() {
		return Err(Error::Validation {
			message: "search.term_delimiter must be non-empty.".to_string(),
		});
	}
	if cfg.search.max_term_chars == 0 {
		return Err(Error::Validation {
			message: "search.max_term_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_terms == 0 {
		return Err(Error::Validation {
			message: "search.max_terms must be greater than zero.".to_string(),
		});
	}
	if cfg.feed.page_size == 0 {
		return Err(Error::Validation {
			message: "feed.page_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
	if cfg.storage.backend == StorageBackend::Memory {
		cfg.storage.postgres = None;
	}
}
