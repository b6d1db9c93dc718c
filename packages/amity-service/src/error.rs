use amity_domain::{profile::KeyRejectCode, term::TermRejectCode};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
}
impl ServiceError {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidInput { message: message.into() }
	}

	pub(crate) fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}

	pub(crate) fn conflict(message: impl Into<String>) -> Self {
		Self::Conflict { message: message.into() }
	}

	pub(crate) fn bad_key(field: &str, code: KeyRejectCode) -> Self {
		let reason = match code {
			KeyRejectCode::RejectEmpty => "must not be empty",
			KeyRejectCode::RejectTooLong => "is too long",
			KeyRejectCode::RejectCharset => "may only contain letters, digits, '_', '.' and '-'",
		};

		Self::invalid(format!("{field} {reason}."))
	}

	pub(crate) fn bad_term(code: TermRejectCode) -> Self {
		let reason = match code {
			TermRejectCode::RejectTooLong => "Search term is too long.",
			TermRejectCode::RejectTooManyTerms => "Search term has too many alternatives.",
			TermRejectCode::RejectControlChar => "Search term contains control characters.",
		};

		Self::invalid(reason)
	}
}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::StoreUnavailable { message: err.to_string() }
	}
}

impl From<amity_storage::Error> for ServiceError {
	fn from(err: amity_storage::Error) -> Self {
		match err {
			amity_storage::Error::Sqlx(inner) => Self::StoreUnavailable { message: inner.to_string() },
			amity_storage::Error::InvalidArgument(message) => Self::InvalidInput { message },
			amity_storage::Error::NotFound(message) => Self::NotFound { message },
			amity_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
