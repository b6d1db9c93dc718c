use sqlx::PgConnection;
use uuid::Uuid;

use crate::{Error, Result, models::ProfileSummary};

/// Appends one search record. Repeats are kept; they only move the result up the recent list.
pub async fn insert_search(
	executor: &mut PgConnection,
	viewer_key: &str,
	result_key: &str,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO search_history (search_id, viewer_key, result_key)
VALUES ($1, $2, $3)",
	)
	.bind(Uuid::new_v4())
	.bind(viewer_key)
	.bind(result_key)
	.execute(&mut *executor)
	.await
	.map_err(|err| Error::from_write(err, &format!("search by {viewer_key} for {result_key}")))?;

	Ok(())
}

/// Distinct profiles the viewer searched for, latest search first.
///
/// With `patterns`, only profiles matching any pattern are returned. Keys in `exclude` are
/// skipped before `limit` applies.
pub async fn recent_searches(
	executor: &mut PgConnection,
	viewer_key: &str,
	patterns: Option<&[String]>,
	exclude: &[String],
	limit: i64,
) -> Result<Vec<ProfileSummary>> {
	if limit <= 0 {
		return Ok(vec![]);
	}

	let rows = sqlx::query_as::<_, ProfileSummary>(
		"\
SELECT p.profile_key, p.first_name, p.last_name
FROM (
	SELECT result_key, max(searched_at) AS last_searched_at
	FROM search_history
	WHERE viewer_key = $1
	GROUP BY result_key
) h
JOIN profiles p ON p.profile_key = h.result_key
WHERE (
		$2::text[] IS NULL
		OR p.first_name ILIKE ANY($2::text[])
		OR p.last_name ILIKE ANY($2::text[])
		OR p.email ILIKE ANY($2::text[])
		OR p.profile_key ILIKE ANY($2::text[])
	)
	AND NOT (p.profile_key = ANY($3::text[]))
ORDER BY h.last_searched_at DESC, p.profile_key COLLATE \"C\"
LIMIT $4",
	)
	.bind(viewer_key)
	.bind(patterns)
	.bind(exclude)
	.bind(limit)
	.fetch_all(&mut *executor)
	.await?;

	Ok(rows)
}
