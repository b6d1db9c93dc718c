#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Classifies a failed write: unique violations become `Conflict`, dangling references become
	/// `NotFound`, everything else stays a driver error.
	pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
		if let Some(db_err) = err.as_database_error() {
			if db_err.is_unique_violation() {
				return Self::Conflict(format!("{what} already exists"));
			}
			if db_err.is_foreign_key_violation() {
				return Self::NotFound(format!("{what} references a missing row"));
			}
			if db_err.is_check_violation() {
				return Self::InvalidArgument(format!("{what} violates a table constraint"));
			}
		}

		Self::Sqlx(err)
	}
}
