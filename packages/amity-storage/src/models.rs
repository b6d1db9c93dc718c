use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Profile {
	pub profile_key: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub dob: Option<Date>,
	pub bio: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// Mutable profile fields. The key is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub dob: Option<Date>,
	pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProfileSummary {
	pub profile_key: String,
	pub first_name: String,
	pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Connection {
	pub low_key: String,
	pub high_key: String,
	pub initiator_key: String,
	pub accepted: bool,
	pub low_descriptor: String,
	pub high_descriptor: String,
	pub created_at: OffsetDateTime,
	pub accepted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
	pub post_id: Uuid,
	pub owner_key: String,
	pub author_key: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
	pub comment_id: Uuid,
	pub post_id: Uuid,
	pub author_key: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub content: String,
}

/// Exactly one of `post_id` and `comment_id` is set; the table enforces it with a check.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Reaction {
	pub reaction_id: Uuid,
	pub author_key: String,
	pub post_id: Option<Uuid>,
	pub comment_id: Option<Uuid>,
	pub is_like: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// Which posts a page query may return.
#[derive(Debug, Clone, Copy)]
pub enum PostScope<'a> {
	/// Posts on one wall.
	Owner(&'a str),
	/// Posts whose wall or author is any of the given keys.
	OwnerOrAuthorIn(&'a [String]),
}
