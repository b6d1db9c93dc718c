//! In-process store for single-node runs and tests.
//!
//! Mirrors the Postgres schema rules: foreign keys fail with `NotFound`, duplicate keys with
//! `Conflict`, and deletes cascade the same way the `ON DELETE CASCADE` clauses do.

use std::{
	collections::{BTreeMap, HashMap},
	sync::{Mutex, MutexGuard},
};

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use amity_domain::{
	connection::ConnectionPair,
	feed::{self, FeedCursor},
	reaction::ReactionTarget,
	term::SearchTerm,
};
use amity_storage::models::{
	Comment, Connection, Post, PostScope, Profile, ProfileFields, ProfileSummary, Reaction,
};

use crate::{
	BoxFuture, ServiceError, ServiceResult,
	store::{CommentStore, ConnectionStore, ContentStore, HistoryStore, ProfileIndex, ProfileStore},
};

#[derive(Default)]
pub struct MemoryStore {
	state: Mutex<State>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads an existing post row as-is, keeping its timestamps at microsecond precision.
	pub fn import_post(&self, post: Post) -> ServiceResult<()> {
		let mut state = self.lock()?;

		state.require_profile(&post.owner_key)?;
		state.require_profile(&post.author_key)?;

		if state.posts.contains_key(&post.post_id) {
			return Err(ServiceError::conflict(format!("post {} already exists", post.post_id)));
		}

		let created_at = feed::to_store_precision(post.created_at);
		let updated_at = feed::to_store_precision(post.updated_at);

		state.posts.insert(post.post_id, Post { created_at, updated_at, ..post });

		Ok(())
	}

	fn lock(&self) -> ServiceResult<MutexGuard<'_, State>> {
		self.state.lock().map_err(|_| ServiceError::StoreUnavailable {
			message: "In-memory store lock is poisoned.".to_string(),
		})
	}

	fn with_state<'a, T, F>(&'a self, f: F) -> BoxFuture<'a, ServiceResult<T>>
	where
		T: Send + 'a,
		F: FnOnce(&mut State) -> ServiceResult<T>,
	{
		let result = self.lock().and_then(|mut state| f(&mut state));

		Box::pin(std::future::ready(result))
	}
}

#[derive(Default)]
struct State {
	profiles: BTreeMap<String, Profile>,
	connections: BTreeMap<(String, String), Connection>,
	posts: HashMap<Uuid, Post>,
	comments: HashMap<Uuid, Comment>,
	reactions: Vec<Reaction>,
	searches: Vec<SearchRecord>,
	last_tick: Option<OffsetDateTime>,
}
impl State {
	/// Wall clock at microsecond precision, strictly increasing across calls.
	fn tick(&mut self) -> OffsetDateTime {
		let now = feed::to_store_precision(OffsetDateTime::now_utc());
		let now = match self.last_tick {
			Some(last) if now <= last => last + Duration::microseconds(1),
			_ => now,
		};

		self.last_tick = Some(now);

		now
	}

	fn require_profile(&self, profile_key: &str) -> ServiceResult<()> {
		if self.profiles.contains_key(profile_key) {
			Ok(())
		} else {
			Err(ServiceError::not_found(format!("profile {profile_key}")))
		}
	}

	fn remove_posts<F>(&mut self, doomed: F)
	where
		F: Fn(&Post) -> bool,
	{
		let post_ids =
			self.posts.values().filter(|post| doomed(post)).map(|post| post.post_id).collect::<Vec<_>>();

		for post_id in post_ids {
			self.posts.remove(&post_id);
			self.reactions.retain(|reaction| reaction.post_id != Some(post_id));

			let comment_ids = self
				.comments
				.values()
				.filter(|comment| comment.post_id == post_id)
				.map(|comment| comment.comment_id)
				.collect::<Vec<_>>();

			for comment_id in comment_ids {
				self.remove_comment(comment_id);
			}
		}
	}

	fn remove_comment(&mut self, comment_id: Uuid) -> bool {
		let removed = self.comments.remove(&comment_id).is_some();

		self.reactions.retain(|reaction| reaction.comment_id != Some(comment_id));

		removed
	}

	fn reaction_index(&self, author_key: &str, target: ReactionTarget) -> Option<usize> {
		self.reactions.iter().position(|reaction| {
			reaction.author_key == author_key
				&& reaction.post_id == target.post_id()
				&& reaction.comment_id == target.comment_id()
		})
	}
}

struct SearchRecord {
	viewer_key: String,
	result_key: String,
	searched_at: OffsetDateTime,
}

fn pair_key(pair: &ConnectionPair) -> (String, String) {
	(pair.low().to_string(), pair.high().to_string())
}

fn summary(profile: &Profile) -> ProfileSummary {
	ProfileSummary {
		profile_key: profile.profile_key.clone(),
		first_name: profile.first_name.clone(),
		last_name: profile.last_name.clone(),
	}
}

fn profile_matches(term: &SearchTerm, profile: &Profile) -> bool {
	term.matches_any([
		profile.profile_key.as_str(),
		profile.first_name.as_str(),
		profile.last_name.as_str(),
		profile.email.as_str(),
	])
}

impl ProfileStore for MemoryStore {
	fn insert_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Profile>> {
		self.with_state(move |state| {
			if state.profiles.contains_key(profile_key) {
				return Err(ServiceError::conflict(format!("profile {profile_key} already exists")));
			}

			let now = state.tick();
			let profile = Profile {
				profile_key: profile_key.to_string(),
				first_name: fields.first_name.clone(),
				last_name: fields.last_name.clone(),
				email: fields.email.clone(),
				dob: fields.dob,
				bio: fields.bio.clone(),
				created_at: now,
				updated_at: now,
			};

			state.profiles.insert(profile_key.to_string(), profile.clone());

			Ok(profile)
		})
	}

	fn get_profile<'a>(
		&'a self,
		profile_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Profile>>> {
		self.with_state(move |state| Ok(state.profiles.get(profile_key).cloned()))
	}

	fn profile_exists<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| Ok(state.profiles.contains_key(profile_key)))
	}

	fn update_profile<'a>(
		&'a self,
		profile_key: &'a str,
		fields: &'a ProfileFields,
	) -> BoxFuture<'a, ServiceResult<Option<Profile>>> {
		self.with_state(move |state| {
			let now = state.tick();
			let Some(profile) = state.profiles.get_mut(profile_key) else {
				return Ok(None);
			};

			profile.first_name = fields.first_name.clone();
			profile.last_name = fields.last_name.clone();
			profile.email = fields.email.clone();
			profile.dob = fields.dob;
			profile.bio = fields.bio.clone();
			profile.updated_at = now;

			Ok(Some(profile.clone()))
		})
	}

	fn delete_profile<'a>(&'a self, profile_key: &'a str) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| {
			if state.profiles.remove(profile_key).is_none() {
				return Ok(false);
			}

			state.connections.retain(|(low, high), _| low != profile_key && high != profile_key);
			state.remove_posts(|post| post.owner_key == profile_key || post.author_key == profile_key);

			let comment_ids = state
				.comments
				.values()
				.filter(|comment| comment.author_key == profile_key)
				.map(|comment| comment.comment_id)
				.collect::<Vec<_>>();

			for comment_id in comment_ids {
				state.remove_comment(comment_id);
			}

			state.reactions.retain(|reaction| reaction.author_key != profile_key);
			state.searches.retain(|record| {
				record.viewer_key != profile_key && record.result_key != profile_key
			});

			Ok(true)
		})
	}

	fn list_profiles_by_keys<'a>(
		&'a self,
		profile_keys: &'a [String],
	) -> BoxFuture<'a, ServiceResult<Vec<Profile>>> {
		self.with_state(move |state| {
			let mut rows = profile_keys
				.iter()
				.filter_map(|key| state.profiles.get(key))
				.cloned()
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| a.profile_key.cmp(&b.profile_key));
			rows.dedup_by(|a, b| a.profile_key == b.profile_key);

			Ok(rows)
		})
	}
}

impl ProfileIndex for MemoryStore {
	fn match_profiles<'a>(
		&'a self,
		term: &'a SearchTerm,
		within: Option<&'a [String]>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		self.with_state(move |state| {
			if term.is_empty() {
				return Ok(vec![]);
			}

			let rows = state
				.profiles
				.values()
				.filter(|profile| {
					within.is_none_or(|keys| keys.contains(&profile.profile_key))
						&& !exclude.contains(&profile.profile_key)
						&& profile_matches(term, profile)
				})
				.take(limit)
				.map(summary)
				.collect();

			Ok(rows)
		})
	}
}

impl ConnectionStore for MemoryStore {
	fn get_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<Option<Connection>>> {
		self.with_state(move |state| Ok(state.connections.get(&pair_key(pair)).cloned()))
	}

	fn insert_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		initiator_key: &'a str,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<Connection>> {
		self.with_state(move |state| {
			if !pair.contains(initiator_key) {
				return Err(ServiceError::invalid("Initiator must be one side of the pair."));
			}

			state.require_profile(pair.low())?;
			state.require_profile(pair.high())?;

			let key = pair_key(pair);

			if state.connections.contains_key(&key) {
				return Err(ServiceError::conflict(format!(
					"connection between {} and {} already exists",
					pair.low(),
					pair.high()
				)));
			}

			let connection = Connection {
				low_key: pair.low().to_string(),
				high_key: pair.high().to_string(),
				initiator_key: initiator_key.to_string(),
				accepted: false,
				low_descriptor: low_descriptor.to_string(),
				high_descriptor: high_descriptor.to_string(),
				created_at: state.tick(),
				accepted_at: None,
			};

			state.connections.insert(key, connection.clone());

			Ok(connection)
		})
	}

	fn set_accepted<'a>(&'a self, pair: &'a ConnectionPair) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| {
			let now = state.tick();
			let Some(connection) = state.connections.get_mut(&pair_key(pair)) else {
				return Ok(false);
			};

			connection.accepted = true;

			if connection.accepted_at.is_none() {
				connection.accepted_at = Some(now);
			}

			Ok(true)
		})
	}

	fn delete_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| Ok(state.connections.remove(&pair_key(pair)).is_some()))
	}

	fn update_descriptors<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| {
			let Some(connection) = state.connections.get_mut(&pair_key(pair)) else {
				return Ok(false);
			};

			connection.low_descriptor = low_descriptor.to_string();
			connection.high_descriptor = high_descriptor.to_string();

			Ok(true)
		})
	}

	fn neighbor_keys<'a>(
		&'a self,
		profile_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<Vec<String>>> {
		self.with_state(move |state| {
			let mut keys = state
				.connections
				.values()
				.filter(|connection| connection.accepted)
				.filter_map(|connection| {
					if connection.low_key == profile_key {
						Some(connection.high_key.clone())
					} else if connection.high_key == profile_key {
						Some(connection.low_key.clone())
					} else {
						None
					}
				})
				.collect::<Vec<_>>();

			keys.sort();

			Ok(keys)
		})
	}
}

impl ContentStore for MemoryStore {
	fn insert_post<'a>(
		&'a self,
		post_id: Uuid,
		owner_key: &'a str,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Post>> {
		self.with_state(move |state| {
			state.require_profile(owner_key)?;
			state.require_profile(author_key)?;

			if state.posts.contains_key(&post_id) {
				return Err(ServiceError::conflict(format!("post {post_id} already exists")));
			}

			let now = state.tick();
			let post = Post {
				post_id,
				owner_key: owner_key.to_string(),
				author_key: author_key.to_string(),
				created_at: now,
				updated_at: now,
				content: content.to_string(),
			};

			state.posts.insert(post_id, post.clone());

			Ok(post)
		})
	}

	fn get_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Post>>> {
		self.with_state(move |state| Ok(state.posts.get(&post_id).cloned()))
	}

	fn update_post_content<'a>(
		&'a self,
		post_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Post>>> {
		self.with_state(move |state| {
			let now = state.tick();
			let Some(post) = state.posts.get_mut(&post_id) else {
				return Ok(None);
			};

			post.content = content.to_string();
			post.updated_at = now;

			Ok(Some(post.clone()))
		})
	}

	fn delete_post<'a>(&'a self, post_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| {
			let existed = state.posts.contains_key(&post_id);

			state.remove_posts(|post| post.post_id == post_id);

			Ok(existed)
		})
	}

	fn list_posts_page<'a>(
		&'a self,
		scope: PostScope<'a>,
		cursor: Option<&'a FeedCursor>,
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<Post>>> {
		self.with_state(move |state| {
			let mut rows = state
				.posts
				.values()
				.filter(|post| match scope {
					PostScope::Owner(owner_key) => post.owner_key == owner_key,
					PostScope::OwnerOrAuthorIn(keys) =>
						keys.contains(&post.owner_key) || keys.contains(&post.author_key),
				})
				.filter(|post| cursor.is_none_or(|cursor| cursor.admits(post.created_at, post.post_id)))
				.cloned()
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| feed::newest_first(a.created_at, a.post_id, b.created_at, b.post_id));
			rows.truncate(limit);

			Ok(rows)
		})
	}
}

impl CommentStore for MemoryStore {
	fn insert_comment<'a>(
		&'a self,
		comment_id: Uuid,
		post_id: Uuid,
		author_key: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Comment>> {
		self.with_state(move |state| {
			state.require_profile(author_key)?;

			if !state.posts.contains_key(&post_id) {
				return Err(ServiceError::not_found(format!("post {post_id}")));
			}
			if state.comments.contains_key(&comment_id) {
				return Err(ServiceError::conflict(format!("comment {comment_id} already exists")));
			}

			let now = state.tick();
			let comment = Comment {
				comment_id,
				post_id,
				author_key: author_key.to_string(),
				created_at: now,
				updated_at: now,
				content: content.to_string(),
			};

			state.comments.insert(comment_id, comment.clone());

			Ok(comment)
		})
	}

	fn get_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<Option<Comment>>> {
		self.with_state(move |state| Ok(state.comments.get(&comment_id).cloned()))
	}

	fn update_comment_content<'a>(
		&'a self,
		comment_id: Uuid,
		content: &'a str,
	) -> BoxFuture<'a, ServiceResult<Option<Comment>>> {
		self.with_state(move |state| {
			let now = state.tick();
			let Some(comment) = state.comments.get_mut(&comment_id) else {
				return Ok(None);
			};

			comment.content = content.to_string();
			comment.updated_at = now;

			Ok(Some(comment.clone()))
		})
	}

	fn delete_comment<'a>(&'a self, comment_id: Uuid) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| Ok(state.remove_comment(comment_id)))
	}

	fn list_comments_for_post<'a>(
		&'a self,
		post_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Vec<Comment>>> {
		self.with_state(move |state| {
			let mut rows = state
				.comments
				.values()
				.filter(|comment| comment.post_id == post_id)
				.cloned()
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| (a.created_at, a.comment_id).cmp(&(b.created_at, b.comment_id)));

			Ok(rows)
		})
	}

	fn insert_reaction<'a>(
		&'a self,
		reaction_id: Uuid,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Reaction>> {
		self.with_state(move |state| {
			state.require_profile(author_key)?;

			let target_exists = match target {
				ReactionTarget::Post(post_id) => state.posts.contains_key(&post_id),
				ReactionTarget::Comment(comment_id) => state.comments.contains_key(&comment_id),
			};

			if !target_exists {
				return Err(ServiceError::not_found(format!("reaction target {target:?}")));
			}
			if state.reaction_index(author_key, target).is_some() {
				return Err(ServiceError::conflict(format!(
					"{author_key} already reacted to {target:?}"
				)));
			}

			let now = state.tick();
			let reaction = Reaction {
				reaction_id,
				author_key: author_key.to_string(),
				post_id: target.post_id(),
				comment_id: target.comment_id(),
				is_like,
				created_at: now,
				updated_at: now,
			};

			state.reactions.push(reaction.clone());

			Ok(reaction)
		})
	}

	fn update_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
		is_like: bool,
	) -> BoxFuture<'a, ServiceResult<Option<Reaction>>> {
		self.with_state(move |state| {
			let now = state.tick();
			let Some(idx) = state.reaction_index(author_key, target) else {
				return Ok(None);
			};
			let reaction = &mut state.reactions[idx];

			reaction.is_like = is_like;
			reaction.updated_at = now;

			Ok(Some(reaction.clone()))
		})
	}

	fn delete_reaction<'a>(
		&'a self,
		author_key: &'a str,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		self.with_state(move |state| {
			let Some(idx) = state.reaction_index(author_key, target) else {
				return Ok(false);
			};

			state.reactions.remove(idx);

			Ok(true)
		})
	}

	fn list_reactions_for_target<'a>(
		&'a self,
		target: ReactionTarget,
	) -> BoxFuture<'a, ServiceResult<Vec<Reaction>>> {
		self.with_state(move |state| {
			let mut rows = state
				.reactions
				.iter()
				.filter(|reaction| {
					reaction.post_id == target.post_id() && reaction.comment_id == target.comment_id()
				})
				.cloned()
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| (a.created_at, &a.author_key).cmp(&(b.created_at, &b.author_key)));

			Ok(rows)
		})
	}
}

impl HistoryStore for MemoryStore {
	fn insert_search<'a>(
		&'a self,
		viewer_key: &'a str,
		result_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>> {
		self.with_state(move |state| {
			state.require_profile(viewer_key)?;
			state.require_profile(result_key)?;

			let searched_at = state.tick();

			state.searches.push(SearchRecord {
				viewer_key: viewer_key.to_string(),
				result_key: result_key.to_string(),
				searched_at,
			});

			Ok(())
		})
	}

	fn recent_searches<'a>(
		&'a self,
		viewer_key: &'a str,
		term: Option<&'a SearchTerm>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		self.with_state(move |state| {
			let mut latest = HashMap::<&str, OffsetDateTime>::new();

			for record in state.searches.iter().filter(|record| record.viewer_key == viewer_key) {
				let entry = latest.entry(record.result_key.as_str()).or_insert(record.searched_at);

				if record.searched_at > *entry {
					*entry = record.searched_at;
				}
			}

			let mut ranked = latest.into_iter().collect::<Vec<_>>();

			ranked.sort_by(|(a_key, a_at), (b_key, b_at)| b_at.cmp(a_at).then(a_key.cmp(b_key)));

			let rows = ranked
				.into_iter()
				.filter(|(key, _)| !exclude.iter().any(|excluded| excluded == key))
				.filter_map(|(key, _)| state.profiles.get(key))
				.filter(|profile| term.is_none_or(|term| profile_matches(term, profile)))
				.take(limit)
				.map(summary)
				.collect();

			Ok(rows)
		})
	}
}
