use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use time::OffsetDateTime;
use tokio::time::Instant;
use uuid::Uuid;

use amity_config::{Config, Feed, Search, Service, Storage, StorageBackend};
use amity_domain::{
	cascade::{SearchMode, Tier},
	connection::{ConnectionPair, ConnectionStatus},
	feed::{self, FeedMode},
	reaction::ReactionTarget,
	term::SearchTerm,
};
use amity_service::{
	AcceptRequest, AmityService, BoxFuture, ConnectionRequest, CreateCommentRequest,
	CreatePostRequest, FeedRequest, MemoryStore, PairRequest, ProfileRequest, ReactionKey,
	ReactionRequest, RecentRequest, SearchHit, SearchRequest, ServiceError, ServiceResult,
	SubmitSearchRequest, TieredSearchEngine,
	store::{ConnectionStore, HistoryStore, ProfileIndex, ProfileStore},
};
use amity_storage::models::{Connection, Post, ProfileFields, ProfileSummary};

fn test_config(page_size: u32) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { backend: StorageBackend::Memory, postgres: None },
		search: Search::default(),
		feed: Feed { page_size },
	}
}

fn test_service() -> (AmityService, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::new());
	let service = AmityService::new(test_config(20), store.clone());

	(service, store)
}

fn fields(first_name: &str) -> ProfileFields {
	ProfileFields {
		first_name: first_name.to_string(),
		last_name: "Doe".to_string(),
		email: format!("{}@example.com", first_name.to_lowercase()),
		dob: None,
		bio: String::new(),
	}
}

async fn seed_profiles<S>(store: &S, profiles: &[(&str, &str)])
where
	S: ProfileStore,
{
	for (key, first_name) in profiles {
		store.insert_profile(key, &fields(first_name)).await.expect("Failed to seed profile.");
	}
}

async fn connect(service: &AmityService, from: &str, to: &str) {
	service
		.connection_request(ConnectionRequest {
			from: from.to_string(),
			to: to.to_string(),
			from_descriptor: String::new(),
			to_descriptor: String::new(),
		})
		.await
		.expect("Failed to request connection.");
	service
		.connection_accept(AcceptRequest { acceptor: to.to_string(), requester: from.to_string() })
		.await
		.expect("Failed to accept connection.");
}

async fn search(service: &AmityService, viewer: &str, term: &str, mode: SearchMode) -> Vec<SearchHit> {
	service
		.search(SearchRequest { viewer: viewer.to_string(), term: term.to_string(), mode })
		.await
		.expect("Search failed.")
		.items
}

fn keyed(hits: &[SearchHit]) -> Vec<(&str, Tier)> {
	hits.iter().map(|hit| (hit.key.as_str(), hit.tier)).collect()
}

fn post_at(owner_key: &str, author_key: &str, created_at: OffsetDateTime, content: &str) -> Post {
	Post {
		post_id: Uuid::new_v4(),
		owner_key: owner_key.to_string(),
		author_key: author_key.to_string(),
		created_at,
		updated_at: created_at,
		content: content.to_string(),
	}
}

fn feed_request(target: &str, mode: FeedMode) -> FeedRequest {
	FeedRequest { target: target.to_string(), mode, before: None, before_post_id: None }
}

enum NeighborFault {
	Fail,
	Stall(Duration),
}

/// Delegates to a memory store, but breaks the connections tier.
struct FaultyNeighbors {
	inner: MemoryStore,
	fault: NeighborFault,
	match_calls: AtomicUsize,
}
impl FaultyNeighbors {
	fn new(fault: NeighborFault) -> Self {
		Self { inner: MemoryStore::new(), fault, match_calls: AtomicUsize::new(0) }
	}
}
impl ConnectionStore for FaultyNeighbors {
	fn get_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<Option<Connection>>> {
		self.inner.get_connection(pair)
	}

	fn insert_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		initiator_key: &'a str,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<Connection>> {
		self.inner.insert_connection(pair, initiator_key, low_descriptor, high_descriptor)
	}

	fn set_accepted<'a>(&'a self, pair: &'a ConnectionPair) -> BoxFuture<'a, ServiceResult<bool>> {
		self.inner.set_accepted(pair)
	}

	fn delete_connection<'a>(
		&'a self,
		pair: &'a ConnectionPair,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		self.inner.delete_connection(pair)
	}

	fn update_descriptors<'a>(
		&'a self,
		pair: &'a ConnectionPair,
		low_descriptor: &'a str,
		high_descriptor: &'a str,
	) -> BoxFuture<'a, ServiceResult<bool>> {
		self.inner.update_descriptors(pair, low_descriptor, high_descriptor)
	}

	fn neighbor_keys<'a>(
		&'a self,
		profile_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<Vec<String>>> {
		Box::pin(async move {
			match self.fault {
				NeighborFault::Fail => Err(ServiceError::StoreUnavailable {
					message: "connection refused".to_string(),
				}),
				NeighborFault::Stall(delay) => {
					tokio::time::sleep(delay).await;

					self.inner.neighbor_keys(profile_key).await
				},
			}
		})
	}
}
impl ProfileIndex for FaultyNeighbors {
	fn match_profiles<'a>(
		&'a self,
		term: &'a SearchTerm,
		within: Option<&'a [String]>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		self.match_calls.fetch_add(1, Ordering::SeqCst);

		self.inner.match_profiles(term, within, exclude, limit)
	}
}
impl HistoryStore for FaultyNeighbors {
	fn insert_search<'a>(
		&'a self,
		viewer_key: &'a str,
		result_key: &'a str,
	) -> BoxFuture<'a, ServiceResult<()>> {
		self.inner.insert_search(viewer_key, result_key)
	}

	fn recent_searches<'a>(
		&'a self,
		viewer_key: &'a str,
		term: Option<&'a SearchTerm>,
		exclude: &'a [String],
		limit: usize,
	) -> BoxFuture<'a, ServiceResult<Vec<ProfileSummary>>> {
		self.inner.recent_searches(viewer_key, term, exclude, limit)
	}
}

async fn seed_faulty(fault: NeighborFault) -> FaultyNeighbors {
	let store = FaultyNeighbors::new(fault);

	seed_profiles(&store.inner, &[("alice", "Alice"), ("bob", "Bob"), ("bobby", "Bobby")]).await;
	store.inner.insert_search("alice", "bobby").await.expect("Failed to record search.");

	store
}

#[tokio::test]
async fn connection_hit_ranks_before_stranger() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice"), ("bob", "Bob"), ("bobby", "Bobby")]).await;
	connect(&service, "alice", "bob").await;

	let hits = search(&service, "alice", "bo", SearchMode::Full).await;

	assert_eq!(keyed(&hits), vec![("bob", Tier::Connections), ("bobby", Tier::Global)]);
}

#[tokio::test]
async fn recent_tier_comes_first_and_tiers_are_disjoint() {
	let (service, store) = test_service();

	seed_profiles(
		store.as_ref(),
		&[("alice", "Alice"), ("bob", "Bob"), ("bobby", "Bobby"), ("boris", "Boris")],
	)
	.await;
	connect(&service, "alice", "bob").await;
	connect(&service, "alice", "bobby").await;
	service
		.search_submit(SubmitSearchRequest {
			viewer: "alice".to_string(),
			result_key: "bobby".to_string(),
		})
		.await
		.expect("Failed to submit search.");

	let hits = search(&service, "alice", "bo", SearchMode::Full).await;

	assert_eq!(
		keyed(&hits),
		vec![("bobby", Tier::Recent), ("bob", Tier::Connections), ("boris", Tier::Global)]
	);
}

#[tokio::test]
async fn search_never_exceeds_budget_or_repeats_keys() {
	let (service, store) = test_service();
	let keys = (0..8).map(|idx| format!("bo{idx}")).collect::<Vec<_>>();

	seed_profiles(store.as_ref(), &[("viewer", "Viewer")]).await;

	for key in &keys {
		seed_profiles(store.as_ref(), &[(key.as_str(), "Someone")]).await;
	}

	connect(&service, "viewer", "bo6").await;

	for result_key in ["bo7", "bo6", "bo7"] {
		service
			.search_submit(SubmitSearchRequest {
				viewer: "viewer".to_string(),
				result_key: result_key.to_string(),
			})
			.await
			.expect("Failed to submit search.");
	}

	let live = search(&service, "viewer", "bo", SearchMode::Live).await;

	assert_eq!(live.len(), 5);
	assert_eq!(
		keyed(&live),
		vec![
			("bo7", Tier::Recent),
			("bo6", Tier::Recent),
			("bo0", Tier::Global),
			("bo1", Tier::Global),
			("bo2", Tier::Global),
		]
	);

	let full = search(&service, "viewer", "bo", SearchMode::Full).await;
	let mut seen = full.iter().map(|hit| hit.key.clone()).collect::<Vec<_>>();

	seen.sort();
	seen.dedup();

	assert_eq!(full.len(), 8);
	assert_eq!(seen.len(), 8);
}

#[tokio::test]
async fn blank_term_returns_recent_searches() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")]).await;

	for result_key in ["bob", "carol"] {
		service
			.search_submit(SubmitSearchRequest {
				viewer: "alice".to_string(),
				result_key: result_key.to_string(),
			})
			.await
			.expect("Failed to submit search.");
	}

	let recent = service
		.search_recent(RecentRequest { viewer: "alice".to_string(), limit: None })
		.await
		.expect("Failed to list recent searches.");

	assert_eq!(keyed(&recent.items), vec![("carol", Tier::Recent), ("bob", Tier::Recent)]);

	for term in ["", "   ", " + +"] {
		let hits = search(&service, "alice", term, SearchMode::Live).await;

		assert_eq!(hits, recent.items, "Unexpected hits for term {term:?}.");
	}
}

#[tokio::test]
async fn malformed_terms_are_rejected() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice")]).await;

	let too_many = (0..17).map(|idx| format!("t{idx}")).collect::<Vec<_>>().join("+");

	for term in ["bo\u{0007}b", too_many.as_str()] {
		let err = service
			.search(SearchRequest {
				viewer: "alice".to_string(),
				term: term.to_string(),
				mode: SearchMode::Full,
			})
			.await
			.expect_err("Expected term rejection.");

		assert!(matches!(err, ServiceError::InvalidInput { .. }), "Unexpected error: {err:?}");
	}
}

#[tokio::test]
async fn failing_connection_tier_aborts_search() {
	let store = seed_faulty(NeighborFault::Fail).await;
	let cfg = Search::default();
	let result = TieredSearchEngine::new(&store, &cfg)
		.search("alice", "bo", SearchMode::Full, None)
		.await;

	assert!(
		matches!(result, Err(ServiceError::StoreUnavailable { .. })),
		"Unexpected result: {result:?}"
	);
	assert_eq!(store.match_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deadline_keeps_hits_gathered_so_far() {
	let store = seed_faulty(NeighborFault::Stall(Duration::from_secs(5))).await;
	let cfg = Search::default();
	let deadline = Instant::now() + Duration::from_millis(50);
	let hits = TieredSearchEngine::new(&store, &cfg)
		.search("alice", "bo", SearchMode::Full, Some(deadline))
		.await
		.expect("Search failed.");

	assert_eq!(keyed(&hits), vec![("bobby", Tier::Recent)]);
	assert_eq!(store.match_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_deadline_returns_nothing() {
	let store = seed_faulty(NeighborFault::Fail).await;
	let cfg = Search::default();
	let hits = TieredSearchEngine::new(&store, &cfg)
		.search("alice", "bo", SearchMode::Full, Some(Instant::now()))
		.await
		.expect("Search failed.");

	assert!(hits.is_empty());
}

#[tokio::test]
async fn submit_search_for_unknown_profile_is_not_found() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice")]).await;

	let err = service
		.search_submit(SubmitSearchRequest {
			viewer: "alice".to_string(),
			result_key: "ghost".to_string(),
		})
		.await
		.expect_err("Expected NotFound.");

	assert!(matches!(err, ServiceError::NotFound { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn feed_lists_connection_posts_newest_first() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice"), ("bob", "Bob")]).await;
	connect(&service, "alice", "bob").await;

	let base = feed::to_store_precision(OffsetDateTime::now_utc()) - time::Duration::hours(1);
	let t100 = base + time::Duration::seconds(100);
	let t200 = base + time::Duration::seconds(200);

	store.import_post(post_at("alice", "bob", t100, "on alice's wall")).expect("Failed to import.");
	store.import_post(post_at("bob", "bob", t200, "on bob's wall")).expect("Failed to import.");

	let first = service.feed(feed_request("alice", FeedMode::Main)).await.expect("Feed failed.");
	let times = first.items.iter().map(|item| item.created_at).collect::<Vec<_>>();

	assert_eq!(times, vec![t200, t100]);

	let older = service
		.feed(FeedRequest { before: Some(t200), ..feed_request("alice", FeedMode::Main) })
		.await
		.expect("Feed failed.");
	let times = older.items.iter().map(|item| item.created_at).collect::<Vec<_>>();

	assert_eq!(times, vec![t100]);
}

#[tokio::test]
async fn feed_shows_each_post_once_and_needs_neighbors() {
	let (service, store) = test_service();

	seed_profiles(
		store.as_ref(),
		&[("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol"), ("dave", "Dave")],
	)
	.await;
	connect(&service, "alice", "bob").await;
	connect(&service, "alice", "carol").await;
	service
		.post_create(CreatePostRequest {
			owner_key: "bob".to_string(),
			author_key: "carol".to_string(),
			content: "hello bob".to_string(),
		})
		.await
		.expect("Failed to create post.");

	let feed = service.feed(feed_request("alice", FeedMode::Main)).await.expect("Feed failed.");

	assert_eq!(feed.items.len(), 1);
	assert!(feed.next_cursor.is_none());

	let lonely = service.feed(feed_request("dave", FeedMode::Main)).await.expect("Feed failed.");

	assert!(lonely.items.is_empty());

	let wall = service.feed(feed_request("bob", FeedMode::Profile)).await.expect("Feed failed.");

	assert_eq!(wall.items.len(), 1);
	assert_eq!(wall.items[0].author_key, "carol");
}

#[tokio::test]
async fn feed_pages_split_identical_timestamps() {
	let store = Arc::new(MemoryStore::new());
	let service = AmityService::new(test_config(2), store.clone());

	seed_profiles(store.as_ref(), &[("alice", "Alice")]).await;

	let at = feed::to_store_precision(OffsetDateTime::now_utc()) - time::Duration::minutes(5);

	for idx in 0..5 {
		store.import_post(post_at("alice", "alice", at, &format!("post {idx}"))).expect("Import failed.");
	}

	let mut seen = Vec::new();
	let mut req = feed_request("alice", FeedMode::Profile);

	loop {
		let page = service.feed(req.clone()).await.expect("Feed failed.");

		assert!(page.items.len() <= 2);

		seen.extend(page.items.iter().map(|item| item.post_id));

		let Some(next) = page.next_cursor else {
			break;
		};

		req.before = Some(next.before);
		req.before_post_id = Some(next.before_post_id);
	}

	let mut unique = seen.clone();

	unique.sort();
	unique.dedup();

	assert_eq!(seen.len(), 5);
	assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn main_feed_pages_cover_every_post_once() {
	let store = Arc::new(MemoryStore::new());
	let service = AmityService::new(test_config(3), store.clone());

	seed_profiles(
		store.as_ref(),
		&[("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol"), ("dave", "Dave"), ("erin", "Erin")],
	)
	.await;
	connect(&service, "alice", "bob").await;
	connect(&service, "alice", "carol").await;

	let base = feed::to_store_precision(OffsetDateTime::now_utc()) - time::Duration::hours(1);
	let at = |secs: i64| base + time::Duration::seconds(secs);
	let rows = [
		("bob", "bob", at(1), true),
		("dave", "carol", at(2), true),
		("alice", "bob", at(2), true),
		("bob", "carol", at(3), true),
		("carol", "dave", at(3), true),
		("dave", "dave", at(3), false),
		("erin", "erin", at(4), false),
		("carol", "carol", at(5), true),
		("bob", "alice", at(5), true),
	];
	let mut expected = Vec::new();

	for (owner_key, author_key, created_at, visible) in rows {
		let post = post_at(owner_key, author_key, created_at, "post");

		if visible {
			expected.push((post.created_at, post.post_id));
		}

		store.import_post(post).expect("Import failed.");
	}

	expected.sort_by(|a, b| b.cmp(a));

	let mut seen = Vec::new();
	let mut pages = 0;
	let mut req = feed_request("alice", FeedMode::Main);

	loop {
		let page = service.feed(req.clone()).await.expect("Feed failed.");

		pages += 1;

		assert!(page.items.len() <= 3);

		seen.extend(page.items.iter().map(|item| (item.created_at, item.post_id)));

		let Some(next) = page.next_cursor else {
			break;
		};

		req.before = Some(next.before);
		req.before_post_id = Some(next.before_post_id);
	}

	assert_eq!(pages, 3);
	assert_eq!(seen, expected);
}

#[tokio::test]
async fn cursor_id_without_timestamp_is_invalid() {
	let (service, _store) = test_service();
	let err = service
		.feed(FeedRequest {
			before_post_id: Some(Uuid::new_v4()),
			..feed_request("alice", FeedMode::Profile)
		})
		.await
		.expect_err("Expected InvalidInput.");

	assert!(matches!(err, ServiceError::InvalidInput { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn connection_lifecycle_follows_request_rules() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice"), ("bob", "Bob")]).await;

	let graph = service.graph();

	assert_eq!(graph.exists("alice", "bob").await.expect("Exists failed."), ConnectionStatus::None);

	graph.request("bob", "alice", "coworker", "mentor").await.expect("Request failed.");

	let reverse = graph.request("alice", "bob", "", "").await;

	assert!(matches!(reverse, Err(ServiceError::Conflict { .. })), "Unexpected: {reverse:?}");

	let by_initiator = graph.accept("bob", "alice").await;

	assert!(
		matches!(by_initiator, Err(ServiceError::InvalidInput { .. })),
		"Unexpected: {by_initiator:?}"
	);
	assert!(graph.neighbors("alice").await.expect("Neighbors failed.").is_empty());

	graph.accept("alice", "bob").await.expect("Accept failed.");
	graph.accept("alice", "bob").await.expect("Second accept must be a no-op.");

	assert_eq!(
		graph.exists("alice", "bob").await.expect("Exists failed."),
		ConnectionStatus::Accepted { initiator: "bob".to_string() }
	);
	assert_eq!(graph.neighbors("bob").await.expect("Neighbors failed."), vec!["alice"]);

	let pair = ConnectionPair::new("bob", "alice").expect("Distinct keys form a pair.");
	let row = store.get_connection(&pair).await.expect("Get failed.").expect("Row must exist.");

	assert_eq!(row.low_descriptor, "mentor");
	assert_eq!(row.high_descriptor, "coworker");

	graph.modify("alice", "bob", "friend", "best friend").await.expect("Modify failed.");

	let row = store.get_connection(&pair).await.expect("Get failed.").expect("Row must exist.");

	assert_eq!(row.low_descriptor, "friend");
	assert_eq!(row.high_descriptor, "best friend");

	service
		.connection_delete(PairRequest { a: "bob".to_string(), b: "alice".to_string() })
		.await
		.expect("Delete failed.");

	let missing = graph.delete("alice", "bob").await;

	assert!(matches!(missing, Err(ServiceError::NotFound { .. })), "Unexpected: {missing:?}");
}

#[tokio::test]
async fn connection_requests_validate_endpoints() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice")]).await;

	let graph = service.graph();
	let self_pair = graph.request("alice", "alice", "", "").await;

	assert!(matches!(self_pair, Err(ServiceError::InvalidInput { .. })), "Unexpected: {self_pair:?}");

	let unknown = graph.request("alice", "ghost", "", "").await;

	assert!(matches!(unknown, Err(ServiceError::NotFound { .. })), "Unexpected: {unknown:?}");

	let no_request = graph.accept("alice", "ghost").await;

	assert!(matches!(no_request, Err(ServiceError::NotFound { .. })), "Unexpected: {no_request:?}");

	let bad_key = graph.exists("alice", "not a key").await;

	assert!(matches!(bad_key, Err(ServiceError::InvalidInput { .. })), "Unexpected: {bad_key:?}");
}

#[tokio::test]
async fn profile_delete_cascades_to_content_and_history() {
	let (service, store) = test_service();

	for (key, first_name) in [("alice", "Alice"), ("bob", "Bob")] {
		service
			.profile_create(ProfileRequest {
				profile_key: key.to_string(),
				first_name: first_name.to_string(),
				last_name: "Doe".to_string(),
				email: String::new(),
				dob: None,
				bio: String::new(),
			})
			.await
			.expect("Failed to create profile.");
	}

	connect(&service, "alice", "bob").await;

	let post = service
		.post_create(CreatePostRequest {
			owner_key: "bob".to_string(),
			author_key: "alice".to_string(),
			content: "hi".to_string(),
		})
		.await
		.expect("Failed to create post.");

	service
		.search_submit(SubmitSearchRequest {
			viewer: "bob".to_string(),
			result_key: "alice".to_string(),
		})
		.await
		.expect("Failed to submit search.");
	service.profile_delete("alice").await.expect("Failed to delete profile.");

	assert!(!service.profile_exists("alice").await.expect("Exists failed.").exists);
	assert!(matches!(service.post_get(post.post_id).await, Err(ServiceError::NotFound { .. })));
	assert!(service.graph().neighbors("bob").await.expect("Neighbors failed.").is_empty());
	assert!(
		store.recent_searches("bob", None, &[], 10).await.expect("Recent failed.").is_empty()
	);

	let again = service.profile_delete("alice").await;

	assert!(matches!(again, Err(ServiceError::NotFound { .. })), "Unexpected: {again:?}");
}

#[tokio::test]
async fn comments_and_reactions_follow_their_post() {
	let (service, store) = test_service();

	seed_profiles(store.as_ref(), &[("alice", "Alice"), ("bob", "Bob")]).await;

	let post = service
		.post_create(CreatePostRequest {
			owner_key: "alice".to_string(),
			author_key: "alice".to_string(),
			content: "first".to_string(),
		})
		.await
		.expect("Failed to create post.");

	for (author_key, content) in [("bob", "one"), ("alice", "two")] {
		service
			.comment_create(CreateCommentRequest {
				post_id: post.post_id,
				author_key: author_key.to_string(),
				content: content.to_string(),
			})
			.await
			.expect("Failed to create comment.");
	}

	let comments = service.comments_for_post(post.post_id).await.expect("List failed.");
	let contents = comments.items.iter().map(|item| item.content.as_str()).collect::<Vec<_>>();

	assert_eq!(contents, vec!["one", "two"]);

	let target = ReactionTarget::Post(post.post_id);
	let like = ReactionRequest { author_key: "bob".to_string(), target, is_like: true };

	service.reaction_create(like.clone()).await.expect("Failed to react.");

	let duplicate = service.reaction_create(like).await;

	assert!(matches!(duplicate, Err(ServiceError::Conflict { .. })), "Unexpected: {duplicate:?}");

	service
		.reaction_modify(ReactionRequest { author_key: "bob".to_string(), target, is_like: false })
		.await
		.expect("Failed to modify reaction.");

	let reactions = service.reactions_for_target(target).await.expect("List failed.");

	assert_eq!((reactions.likes, reactions.dislikes), (0, 1));

	service.post_delete(post.post_id).await.expect("Failed to delete post.");

	assert!(service.reactions_for_target(target).await.expect("List failed.").items.is_empty());

	let orphan = service
		.comment_create(CreateCommentRequest {
			post_id: post.post_id,
			author_key: "bob".to_string(),
			content: "late".to_string(),
		})
		.await;

	assert!(matches!(orphan, Err(ServiceError::NotFound { .. })), "Unexpected: {orphan:?}");

	let gone =
		service.reaction_delete(ReactionKey { author_key: "bob".to_string(), target }).await;

	assert!(matches!(gone, Err(ServiceError::NotFound { .. })), "Unexpected: {gone:?}");
}
