//! Storage seams used by the service components.
//!
//! Each trait covers one concern so a component can be built over the narrowest store it needs.
//! [`Store`] is the union the service holds at runtime.

use uuid::Uuid;

use amity_domain::{
	connection::ConnectionPair, feed::FeedCursor, reaction::ReactionTarget, term::SearchTerm,
};
use amity_storage::models::{
	Comment, Connection, Post, PostScope, Profile, ProfileFields, ProfileSummary, Reaction,
};

use crate::{BoxFuture, ServiceResult};

pub trait ProfileStore
where
	Self: Send + Sync,
{
	fn insert_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Profile>>;

	fn get_profile<'a>(&'a self, profile_key: &'a str)
	-> BoxFuture<'a, ServiceResult<Option<Profile>>>;

	fn profile_exists<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>>;

	fn update_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Option<Profile>>>;

	/// Removes the profile and everything that references it.
	fn delete_profile<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>>;

	/// Profiles for the given keys, ordered by key. Unknown keys are skipped.
	fn list_profiles_by_keys<'a>(
		&'a self,
		profile_keys: &'a [String],
	) -> BoxFuture<'a, ServiceResult<Vec<Profile>>>;
}

pub trait ProfileIndex
where
	Self: Send + Sync,
{
	/// Profiles whose key, names or email contain any token of `term`, ordered by key.
	///
	/// `within` restricts candidates to the given keys; `Some(&[])` matches nothing.
	fn match_profiles<'a>(
		&'a self,
		term: &'a SearchTerm,
		within: Option<&'a [String]>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>>;
}

pub trait ConnectionStore
where
	Self: Send + Sync,
{
	fn get_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<Option<Connection>>>;

	/// Fails with `Conflict` when a row already exists for the pair.
	fn insert_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		initiator_key: &'a str,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<Connection>>;

	/// Returns `false` when the row no longer exists.
	fn set_accepted<'a>(&'a self, pair: &'a ConnectionPair) -> BoxFuture<'a, ServiceResult<bool>>;

	fn delete_connection<'a>(&'a self, pair: &'a ConnectionPair)
	-> BoxFuture<'a, ServiceResult<bool>>;

	fn update_descriptors<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<bool>>;

	/// Accepted neighbours of `profile_key`, sorted by key.
	fn neighbor_keys<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<Vec<String>>>;
}

pub trait ContentStore
where
	Self: Send + Sync,
{
	fn insert_post<'a>(
		&'a self,
		post_id: Uuid,
		owner_key: &'a str,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Post>>;

	fn get_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Post>>>;

	fn update_post_content<'a>(
		&'a self,
		post_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Post>>>;

	fn delete_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>>;

	/// One page of posts in scope, newest first, strictly below `cursor`.
	fn list_posts_page<'a>(
		&'a self,
		scope: PostScope<'a>,
		cursor: Option<&'a FeedCursor>,
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<Post>>>;
}

pub trait CommentStore
where
	Self: Send + Sync,
{
	fn insert_comment<'a>(
		&'a self,
		comment_id: Uuid,
		post_id: Uuid,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Comment>>;

	fn get_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Comment>>>;

	fn update_comment_content<'a>(
		&'a self,
		comment_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Comment>>>;

	fn delete_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>>;

	/// Comments on one post, oldest first.
	fn list_comments_for_post<'a>(
		&'a self,
		post_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Vec<Comment>>>;

	/// Fails with `Conflict` when the author already reacted to the target.
	fn insert_reaction<'a>(
		&'a self,
		reaction_id: Uuid,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Reaction>>;

	fn update_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Option<Reaction>>>;

	fn delete_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<bool>>;

	fn list_reactions_for_target<'a>(
		&'a self,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<Vec<Reaction>>>;
}

pub trait HistoryStore
where
	Self: Send + Sync,
{
	/// Fails with `NotFound` when either profile is unknown.
	fn insert_search<'a>(
		&'a self,
		viewer_key: &'a str,
		result_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>>;

	/// Distinct profiles the viewer searched for, most recent first.
	fn recent_searches<'a>(
		&'a self,
		viewer_key: &'a str,
		term: Option<&'a SearchTerm>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>>;
}

pub trait Store:
	ProfileStore + ProfileIndex + ConnectionStore + ContentStore + CommentStore + HistoryStore
{
}
impl<T> Store for T where
	T: ProfileStore + ProfileIndex + ConnectionStore + ContentStore + CommentStore + HistoryStore
{
}
