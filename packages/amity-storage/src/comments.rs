use sqlx::PgConnection;
use uuid::Uuid;

use crate::{Error, Result, models::Comment};

const COMMENT_COLUMNS: &str = "comment_id, post_id, author_key, created_at, updated_at, content";

pub async fn insert_comment(
	executor: &mut PgConnection,
	comment_id: Uuid,
	post_id: Uuid,
	author_key: &str,
	content: &str,
) -> Result<Comment> {
	let sql = format!(
		"\
INSERT INTO comments (comment_id, post_id, author_key, content)
VALUES ($1, $2, $3, $4)
RETURNING {COMMENT_COLUMNS}"
	);

	sqlx::query_as::<_, Comment>(&sql)
		.bind(comment_id)
		.bind(post_id)
		.bind(author_key)
		.bind(content)
		.fetch_one(&mut *executor)
		.await
		.map_err(|err| Error::from_write(err, &format!("comment {comment_id}")))
}

pub async fn get_comment(executor: &mut PgConnection, comment_id: Uuid) -> Result<Option<Comment>> {
	let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = $1");
	let row = sqlx::query_as::<_, Comment>(&sql)
		.bind(comment_id)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn update_comment_content(
	executor: &mut PgConnection,
	comment_id: Uuid,
	content: &str,
) -> Result<Option<Comment>> {
	let sql = format!(
		"\
UPDATE comments
SET
	content = $2,
	updated_at = clock_timestamp()
WHERE comment_id = $1
RETURNING {COMMENT_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Comment>(&sql)
		.bind(comment_id)
		.bind(content)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn delete_comment(executor: &mut PgConnection, comment_id: Uuid) -> Result<bool> {
	let res = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
		.bind(comment_id)
		.execute(&mut *executor)
		.await?;

	Ok(res.rows_affected() > 0)
}

/// Comments on a post, oldest first.
pub async fn list_comments_for_post(
	executor: &mut PgConnection,
	post_id: Uuid,
) -> Result<Vec<Comment>> {
	let sql = format!(
		"\
SELECT {COMMENT_COLUMNS}
FROM comments
WHERE post_id = $1
ORDER BY created_at ASC, comment_id ASC"
	);
	let rows =
		sqlx::query_as::<_, Comment>(&sql).bind(post_id).fetch_all(&mut *executor).await?;

	Ok(rows)
}
