use uuid::Uuid;

use amity_domain::{
	connection::ConnectionPair, feed::FeedCursor, reaction::ReactionTarget, term::SearchTerm,
};
use amity_storage::{
	comments, connections,
	db::Db,
	models::{Comment, Connection, Post, PostScope, Profile, ProfileFields, ProfileSummary, Reaction},
	posts, profiles, reactions, search_history,
};

use crate::{
	BoxFuture, ServiceResult,
	store::{CommentStore, ConnectionStore, ContentStore, HistoryStore, ProfileIndex, ProfileStore},
};

/// Postgres-backed store. Each call runs on its own pooled connection.
pub struct PgStore {
	pub db: Db,
}
impl PgStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

fn sql_limit(limit: usize) -> i64 {
	i64::try_from(limit).unwrap_or(i64::MAX)
}

impl ProfileStore for PgStore {
	fn insert_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Profile>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::insert_profile(&mut conn, profile_key, fields).await?)
		})
	}

	fn get_profile<'a>(
		&'a self,
		profile_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Profile>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::get_profile(&mut conn, profile_key).await?)
		})
	}

	fn profile_exists<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::profile_exists(&mut conn, profile_key).await?)
		})
	}

	fn update_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Option<Profile>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::update_profile(&mut conn, profile_key, fields).await?)
		})
	}

	fn delete_profile<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::delete_profile(&mut conn, profile_key).await?)
		})
	}

	fn list_profiles_by_keys<'a>(
		&'a self,
		profile_keys: &'a [String],
	) -> BoxFuture<'a, ServiceResult<Vec<Profile>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::list_profiles_by_keys(&mut conn, profile_keys).await?)
		})
	}
}

impl ProfileIndex for PgStore {
	fn match_profiles<'a>(
		&'a self,
		term: &'a SearchTerm,
		within: Option<&'a [String]>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		Box::pin(async move {
			let patterns = term.like_patterns();
			let mut conn = self.db.pool.acquire().await?;

			Ok(profiles::match_profiles(&mut conn, &patterns, within, exclude, sql_limit(limit))
				.await?)
		})
	}
}

impl ConnectionStore for PgStore {
	fn get_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<Option<Connection>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(connections::get_connection(&mut conn, pair.low(), pair.high()).await?)
		})
	}

	fn insert_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		initiator_key: &'a str,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<Connection>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(connections::insert_connection(
				&mut conn,
				pair.low(),
				pair.high(),
				initiator_key,
				low_descriptor,
				high_descriptor,
			)
			.await?)
		})
	}

	fn set_accepted<'a>(&'a self, pair: &'a ConnectionPair) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(connections::set_accepted(&mut conn, pair.low(), pair.high()).await? > 0)
		})
	}

	fn delete_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(connections::delete_connection(&mut conn, pair.low(), pair.high()).await? > 0)
		})
	}

	fn update_descriptors<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;
			let updated = connections::update_descriptors(
				&mut conn,
				pair.low(),
				pair.high(),
				low_descriptor,
				high_descriptor,
			)
			.await?;

			Ok(updated > 0)
		})
	}

	fn neighbor_keys<'a>(
		&'a self,
		profile_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<Vec<String>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(connections::neighbor_keys(&mut conn, profile_key).await?)
		})
	}
}

impl ContentStore for PgStore {
	fn insert_post<'a>(
		&'a self,
		post_id: Uuid,
		owner_key: &'a str,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Post>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(posts::insert_post(&mut conn, post_id, owner_key, author_key, content).await?)
		})
	}

	fn get_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Post>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(posts::get_post(&mut conn, post_id).await?)
		})
	}

	fn update_post_content<'a>(
		&'a self,
		post_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Post>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(posts::update_post_content(&mut conn, post_id, content).await?)
		})
	}

	fn delete_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(posts::delete_post(&mut conn, post_id).await?)
		})
	}

	fn list_posts_page<'a>(
		&'a self,
		scope: PostScope<'a>,
		cursor: Option<&'a FeedCursor>,
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<Post>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(posts::list_posts_page(&mut conn, scope, cursor, sql_limit(limit)).await?)
		})
	}
}

impl CommentStore for PgStore {
	fn insert_comment<'a>(
		&'a self,
		comment_id: Uuid,
		post_id: Uuid,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Comment>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(comments::insert_comment(&mut conn, comment_id, post_id, author_key, content).await?)
		})
	}

	fn get_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Comment>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(comments::get_comment(&mut conn, comment_id).await?)
		})
	}

	fn update_comment_content<'a>(
		&'a self,
		comment_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Comment>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(comments::update_comment_content(&mut conn, comment_id, content).await?)
		})
	}

	fn delete_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(comments::delete_comment(&mut conn, comment_id).await?)
		})
	}

	fn list_comments_for_post<'a>(
		&'a self,
		post_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Vec<Comment>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(comments::list_comments_for_post(&mut conn, post_id).await?)
		})
	}

	fn insert_reaction<'a>(
		&'a self,
		reaction_id: Uuid,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Reaction>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(reactions::insert_reaction(&mut conn, reaction_id, author_key, target, is_like)
				.await?)
		})
	}

	fn update_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Option<Reaction>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(reactions::update_reaction(&mut conn, author_key, target, is_like).await?)
		})
	}

	fn delete_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(reactions::delete_reaction(&mut conn, author_key, target).await?)
		})
	}

	fn list_reactions_for_target<'a>(
		&'a self,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<Vec<Reaction>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(reactions::list_reactions_for_target(&mut conn, target).await?)
		})
	}
}

impl HistoryStore for PgStore {
	fn insert_search<'a>(
		&'a self,
		viewer_key: &'a str,
		result_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(search_history::insert_search(&mut conn, viewer_key, result_key).await?)
		})
	}

	fn recent_searches<'a>(
		&'a self,
		viewer_key: &'a str,
		term: Option<&'a SearchTerm>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		Box::pin(async move {
			let patterns = term.map(SearchTerm::like_patterns);
			let mut conn = self.db.pool.acquire().await?;
			let rows = search_history::recent_searches(
				&mut conn,
				viewer_key,
				patterns.as_deref(),
				exclude,
				sql_limit(limit),
			)
			.await?;

			Ok(rows)
		})
	}
}
