use sqlx::PgConnection;

use crate::{Error, Result, models::Connection};

const CONNECTION_COLUMNS: &str = "low_key, high_key, initiator_key, accepted, low_descriptor, \
	high_descriptor, created_at, accepted_at";

pub async fn get_connection(
	executor: &mut PgConnection,
	low_key: &str,
	high_key: &str,
) -> Result<Option<Connection>> {
	let sql = format!(
		"SELECT {CONNECTION_COLUMNS} FROM connections WHERE low_key = $1 AND high_key = $2"
	);
	let row = sqlx::query_as::<_, Connection>(&sql)
		.bind(low_key)
		.bind(high_key)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

/// Inserts a pending connection. A second row for the same pair is a `Conflict`.
pub async fn insert_connection(
	executor: &mut PgConnection,
	low_key: &str,
	high_key: &str,
	initiator_key: &str,
	low_descriptor: &str,
	high_descriptor: &str,
) -> Result<Connection> {
	if low_key >= high_key {
		return Err(Error::InvalidArgument(format!(
			"connection keys must be in canonical order; low_key={low_key} high_key={high_key}"
		)));
	}

	let sql = format!(
		"\
INSERT INTO connections (
	low_key,
	high_key,
	initiator_key,
	accepted,
	low_descriptor,
	high_descriptor
)
VALUES ($1, $2, $3, false, $4, $5)
RETURNING {CONNECTION_COLUMNS}"
	);

	sqlx::query_as::<_, Connection>(&sql)
		.bind(low_key)
		.bind(high_key)
		.bind(initiator_key)
		.bind(low_descriptor)
		.bind(high_descriptor)
		.fetch_one(&mut *executor)
		.await
		.map_err(|err| Error::from_write(err, &format!("connection {low_key}<->{high_key}")))
}

/// Marks the pair accepted. Already-accepted rows keep their original `accepted_at`.
pub async fn set_accepted(
	executor: &mut PgConnection,
	low_key: &str,
	high_key: &str,
) -> Result<u64> {
	let res = sqlx::query(
		"\
UPDATE connections
SET
	accepted = true,
	accepted_at = COALESCE(accepted_at, now())
WHERE low_key = $1 AND high_key = $2",
	)
	.bind(low_key)
	.bind(high_key)
	.execute(&mut *executor)
	.await?;

	Ok(res.rows_affected())
}

pub async fn delete_connection(
	executor: &mut PgConnection,
	low_key: &str,
	high_key: &str,
) -> Result<u64> {
	let res = sqlx::query("DELETE FROM connections WHERE low_key = $1 AND high_key = $2")
		.bind(low_key)
		.bind(high_key)
		.execute(&mut *executor)
		.await?;

	Ok(res.rows_affected())
}

pub async fn update_descriptors(
	executor: &mut PgConnection,
	low_key: &str,
	high_key: &str,
	low_descriptor: &str,
	high_descriptor: &str,
) -> Result<u64> {
	let res = sqlx::query(
		"\
UPDATE connections
SET
	low_descriptor = $3,
	high_descriptor = $4
WHERE low_key = $1 AND high_key = $2",
	)
	.bind(low_key)
	.bind(high_key)
	.bind(low_descriptor)
	.bind(high_descriptor)
	.execute(&mut *executor)
	.await?;

	Ok(res.rows_affected())
}

/// Keys joined to `profile_key` by an accepted connection, in byte order.
pub async fn neighbor_keys(executor: &mut PgConnection, profile_key: &str) -> Result<Vec<String>> {
	let rows: Vec<String> = sqlx::query_scalar(
		"\
SELECT neighbor_key
FROM (
	SELECT CASE WHEN low_key = $1 THEN high_key ELSE low_key END AS neighbor_key
	FROM connections
	WHERE accepted
		AND (low_key = $1 OR high_key = $1)
) neighbors
ORDER BY neighbor_key COLLATE \"C\"",
	)
	.bind(profile_key)
	.fetch_all(&mut *executor)
	.await?;

	Ok(rows)
}
