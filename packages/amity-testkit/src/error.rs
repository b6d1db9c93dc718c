pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("AMITY_PG_DSN is not a valid Postgres DSN: {0}")]
	InvalidDsn(#[source] sqlx::Error),

	#[error("No maintenance database is reachable: {0}")]
	Unreachable(#[source] sqlx::Error),

	#[error("Failed to create test database {name}: {source}")]
	Create { name: String, source: sqlx::Error },

	#[error("Failed to drop test database {name}: {source}")]
	Drop { name: String, source: sqlx::Error },
}
