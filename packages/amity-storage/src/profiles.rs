use sqlx::PgConnection;

use crate::{
	Error, Result,
	models::{Profile, ProfileFields, ProfileSummary},
};

const PROFILE_COLUMNS: &str =
	"profile_key, first_name, last_name, email, dob, bio, created_at, updated_at";

pub async fn insert_profile(
	executor: &mut PgConnection,
	profile_key: &str,
	fields: &ProfileFields,
) -> Result<Profile> {
	let sql = format!(
		"\
INSERT INTO profiles (profile_key, first_name, last_name, email, dob, bio)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING {PROFILE_COLUMNS}"
	);

	sqlx::query_as::<_, Profile>(&sql)
		.bind(profile_key)
		.bind(fields.first_name.as_str())
		.bind(fields.last_name.as_str())
		.bind(fields.email.as_str())
		.bind(fields.dob)
		.bind(fields.bio.as_str())
		.fetch_one(&mut *executor)
		.await
		.map_err(|err| Error::from_write(err, &format!("profile {profile_key}")))
}

pub async fn get_profile(executor: &mut PgConnection, profile_key: &str) -> Result<Option<Profile>> {
	let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_key = $1");
	let row = sqlx::query_as::<_, Profile>(&sql)
		.bind(profile_key)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn profile_exists(executor: &mut PgConnection, profile_key: &str) -> Result<bool> {
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM profiles WHERE profile_key = $1)")
			.bind(profile_key)
			.fetch_one(&mut *executor)
			.await?;

	Ok(exists)
}

pub async fn update_profile(
	executor: &mut PgConnection,
	profile_key: &str,
	fields: &ProfileFields,
) -> Result<Option<Profile>> {
	let sql = format!(
		"\
UPDATE profiles
SET
	first_name = $2,
	last_name = $3,
	email = $4,
	dob = $5,
	bio = $6,
	updated_at = now()
WHERE profile_key = $1
RETURNING {PROFILE_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Profile>(&sql)
		.bind(profile_key)
		.bind(fields.first_name.as_str())
		.bind(fields.last_name.as_str())
		.bind(fields.email.as_str())
		.bind(fields.dob)
		.bind(fields.bio.as_str())
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

/// Dependent rows go with the profile through `ON DELETE CASCADE`.
pub async fn delete_profile(executor: &mut PgConnection, profile_key: &str) -> Result<bool> {
	let res = sqlx::query("DELETE FROM profiles WHERE profile_key = $1")
		.bind(profile_key)
		.execute(&mut *executor)
		.await?;

	Ok(res.rows_affected() > 0)
}

pub async fn list_profiles_by_keys(
	executor: &mut PgConnection,
	profile_keys: &[String],
) -> Result<Vec<Profile>> {
	if profile_keys.is_empty() {
		return Ok(vec![]);
	}

	let sql = format!(
		"\
SELECT {PROFILE_COLUMNS}
FROM profiles
WHERE profile_key = ANY($1::text[])
ORDER BY profile_key COLLATE \"C\""
	);
	let rows = sqlx::query_as::<_, Profile>(&sql)
		.bind(profile_keys)
		.fetch_all(&mut *executor)
		.await?;

	Ok(rows)
}

/// Profiles where any pattern matches first name, last name, email or key.
///
/// `within` restricts the candidates to a key set; `exclude` removes keys already taken by the
/// caller so `limit` counts only new rows.
pub async fn match_profiles(
	executor: &mut PgConnection,
	patterns: &[String],
	within: Option<&[String]>,
	exclude: &[String],
	limit: i64,
) -> Result<Vec<ProfileSummary>> {
	if patterns.is_empty() || limit <= 0 {
		return Ok(vec![]);
	}
	if within.is_some_and(<[String]>::is_empty) {
		return Ok(vec![]);
	}

	let rows = sqlx::query_as::<_, ProfileSummary>(
		"\
SELECT profile_key, first_name, last_name
FROM profiles
WHERE (
		first_name ILIKE ANY($1::text[])
		OR last_name ILIKE ANY($1::text[])
		OR email ILIKE ANY($1::text[])
		OR profile_key ILIKE ANY($1::text[])
	)
	AND ($2::text[] IS NULL OR profile_key = ANY($2::text[]))
	AND NOT (profile_key = ANY($3::text[]))
ORDER BY profile_key COLLATE \"C\"
LIMIT $4",
	)
	.bind(patterns)
	.bind(within)
	.bind(exclude)
	.bind(limit)
	.fetch_all(&mut *executor)
	.await?;

	Ok(rows)
}
