use std::sync::LazyLock;

use regex::Regex;

pub const MAX_PROFILE_KEY_CHARS: usize = 64;

const PROFILE_KEY_PATTERN: &str = r"^[A-Za-z0-9_.\-]{1,64}$";

static PROFILE_KEY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(PROFILE_KEY_PATTERN).expect("valid profile key regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejectCode {
	RejectEmpty,
	RejectTooLong,
	RejectCharset,
}

/// Profile keys are URL-safe handles; they appear verbatim in routes and never change.
pub fn check_profile_key(key: &str) -> Result<(), KeyRejectCode> {
	if key.is_empty() {
		return Err(KeyRejectCode::RejectEmpty);
	}
	if key.chars().count() > MAX_PROFILE_KEY_CHARS {
		return Err(KeyRejectCode::RejectTooLong);
	}

	if !PROFILE_KEY.is_match(key) {
		return Err(KeyRejectCode::RejectCharset);
	}

	Ok(())
}

pub fn is_valid_profile_key(key: &str) -> bool {
	check_profile_key(key).is_ok()
}
