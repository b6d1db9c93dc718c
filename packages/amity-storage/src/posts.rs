use sqlx::PgConnection;
use uuid::Uuid;

use amity_domain::feed::FeedCursor;

use crate::{
	Error, Result,
	models::{Post, PostScope},
};

const POST_COLUMNS: &str = "post_id, owner_key, author_key, created_at, updated_at, content";

pub async fn insert_post(
	executor: &mut PgConnection,
	post_id: Uuid,
	owner_key: &str,
	author_key: &str,
	content: &str,
) -> Result<Post> {
	let sql = format!(
		"\
INSERT INTO posts (post_id, owner_key, author_key, content)
VALUES ($1, $2, $3, $4)
RETURNING {POST_COLUMNS}"
	);

	sqlx::query_as::<_, Post>(&sql)
		.bind(post_id)
		.bind(owner_key)
		.bind(author_key)
		.bind(content)
		.fetch_one(&mut *executor)
		.await
		.map_err(|err| Error::from_write(err, &format!("post {post_id}")))
}

pub async fn get_post(executor: &mut PgConnection, post_id: Uuid) -> Result<Option<Post>> {
	let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = $1");
	let row =
		sqlx::query_as::<_, Post>(&sql).bind(post_id).fetch_optional(&mut *executor).await?;

	Ok(row)
}

pub async fn update_post_content(
	executor: &mut PgConnection,
	post_id: Uuid,
	content: &str,
) -> Result<Option<Post>> {
	let sql = format!(
		"\
UPDATE posts
SET
	content = $2,
	updated_at = clock_timestamp()
WHERE post_id = $1
RETURNING {POST_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Post>(&sql)
		.bind(post_id)
		.bind(content)
		.fetch_optional(&mut *executor)
		.await?;

	Ok(row)
}

pub async fn delete_post(executor: &mut PgConnection, post_id: Uuid) -> Result<bool> {
	let res = sqlx::query("DELETE FROM posts WHERE post_id = $1")
		.bind(post_id)
		.execute(&mut *executor)
		.await?;

	Ok(res.rows_affected() > 0)
}

/// One page of posts in feed order, strictly past `cursor`.
pub async fn list_posts_page(
	executor: &mut PgConnection,
	scope: PostScope<'_>,
	cursor: Option<&FeedCursor>,
	limit: i64,
) -> Result<Vec<Post>> {
	if limit <= 0 {
		return Ok(vec![]);
	}

	let before = cursor.map(|cursor| cursor.before);
	let before_post_id = cursor.and_then(|cursor| cursor.before_post_id);
	let cursor_filter = "\
	AND (
		$2::timestamptz IS NULL
		OR ($3::uuid IS NULL AND created_at < $2::timestamptz)
		OR ($3::uuid IS NOT NULL AND (created_at, post_id) < ($2::timestamptz, $3::uuid))
	)";
	let rows = match scope {
		PostScope::Owner(owner_key) => {
			let sql = format!(
				"\
SELECT {POST_COLUMNS}
FROM posts
WHERE owner_key = $1
{cursor_filter}
ORDER BY created_at DESC, post_id DESC
LIMIT $4"
			);

			sqlx::query_as::<_, Post>(&sql)
				.bind(owner_key)
				.bind(before)
				.bind(before_post_id)
				.bind(limit)
				.fetch_all(&mut *executor)
				.await?
		},
		PostScope::OwnerOrAuthorIn(keys) => {
			if keys.is_empty() {
				return Ok(vec![]);
			}

			let sql = format!(
				"\
SELECT {POST_COLUMNS}
FROM posts
WHERE (owner_key = ANY($1::text[]) OR author_key = ANY($1::text[]))
{cursor_filter}
ORDER BY created_at DESC, post_id DESC
LIMIT $4"
			);

			sqlx::query_as::<_, Post>(&sql)
				.bind(keys)
				.bind(before)
				.bind(before_post_id)
				.bind(limit)
				.fetch_all(&mut *executor)
				.await?
		},
	};

	Ok(rows)
}
