use sqlx::PgConnection;
use uuid::Uuid;

use amity_domain::reaction::ReactionTarget;

use crate::{Error, Result, models::Reaction};

const REACTION_COLUMNS: &str =
	"reaction_id, author_key, post_id, comment_id, is_like, created_at, updated_at";

/// Inserts a reaction. A second reaction by the same author on the same target is a `Conflict`.
pub async fn insert_reaction(
	executor: &mut PgConnection,
	reaction_id: Uuid,
	author_key: &str,
	target: ReactionTarget,
	is_like: bool,
) -> Result<Reaction> {
	let sql = format!(
		"\
INSERT INTO reactions (reaction_id, author_key, post_id, comment_id, is_like)
VALUES ($1, $2, $3, $4, $5)
RETURNING {REACTION_COLUMNS}"
	);

	sqlx::query_as::<_, Reaction>(&sql)
		.bind(reaction_id)
		.bind(author_key)
		.bind(target.post_id())
		.bind(target.comment_id())
		.bind(is_like)
		.fetch_one(&mut *executor)
		.await
		.map_err(|err| Error::from_write(err, &format!("reaction by {author_key} on {target:?}")))
}

pub async fn get_reaction(
	executor: &mut PgConnection,
	author_key: &str,
	target: ReactionTarget,
) -> Result<Option<Reaction>> {
	let sql = format!(
		"\
SELECT {REACTION_COLUMNS}
FROM reactions
WHERE author_key = $1
	AND post_id IS NOT DISTINCT FROM $2
	AND comment_id IS NOT DISTINCT FROM $3"
	);
	let row = sqlx::query_as::<_, Reaction>(&sql)
		.bind(author_key)
		.bind(target.post_id())
		.bind(target.comment_id())
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn update_reaction(
	executor: &mut PgConnection,
	author_key: &str,
	target: ReactionTarget,
	is_like: bool,
) -> Result<Option<Reaction>> {
	let sql = format!(
		"\
UPDATE reactions
SET
	is_like = $4,
	updated_at = now()
WHERE author_key = $1
	AND post_id IS NOT DISTINCT FROM $2
	AND comment_id IS NOT DISTINCT FROM $3
RETURNING {REACTION_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Reaction>(&sql)
		.bind(author_key)
		.bind(target.post_id())
		.bind(target.comment_id())
		.bind(is_like)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn delete_reaction(
	executor: &mut PgConnection,
	author_key: &str,
	target: ReactionTarget,
) -> Result<bool> {
	let res = sqlx::query(
		"\
DELETE FROM reactions
WHERE author_key = $1
	AND post_id IS NOT DISTINCT FROM $2
	AND comment_id IS NOT DISTINCT FROM $3",
	)
	.bind(author_key)
	.bind(target.post_id())
	.bind(target.comment_id())
	.execute(&mut *executor)
	.await?;

	Ok(res.rows_affected() > 0)
}

pub async fn list_reactions_for_target(
	executor: &mut PgConnection,
	target: ReactionTarget,
) -> Result<Vec<Reaction>> {
	let sql = format!(
		"\
SELECT {REACTION_COLUMNS}
FROM reactions
WHERE post_id IS NOT DISTINCT FROM $1
	AND comment_id IS NOT DISTINCT FROM $2
ORDER BY created_at ASC, author_key COLLATE \"C\""
	);
	let rows = sqlx::query_as::<_, Reaction>(&sql)
		.bind(target.post_id())
		.bind(target.comment_id())
		.fetch_all(&mut *executor)
		.await?;

	Ok(rows)
}
