//! Undirected connection graph over profile keys.
//!
//! A pair is `none`, `pending` (requested by one side) or `accepted`. Only accepted pairs count
//! as neighbours.

use amity_domain::{
	connection::{ConnectionPair, ConnectionStatus},
	profile,
};
use amity_storage::models::Connection;

use crate::{
	AmityService, ServiceError, ServiceResult,
	store::{ConnectionStore, Store},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConnectionRequest {
	pub from: String,
	pub to: String,
	/// How `from` describes `to`.
	#[serde(default)]
	pub from_descriptor: String,
	/// How `to` describes `from`.
	#[serde(default)]
	pub to_descriptor: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AcceptRequest {
	pub acceptor: String,
	pub requester: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PairRequest {
	pub a: String,
	pub b: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConnectionView {
	pub low_key: String,
	pub high_key: String,
	pub initiator_key: String,
	pub accepted: bool,
	pub low_descriptor: String,
	pub high_descriptor: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "crate::time_serde::option")]
	pub accepted_at: Option<time::OffsetDateTime>,
}
impl From<Connection> for ConnectionView {
	fn from(row: Connection) -> Self {
		Self {
			low_key: row.low_key,
			high_key: row.high_key,
			initiator_key: row.initiator_key,
			accepted: row.accepted,
			low_descriptor: row.low_descriptor,
			high_descriptor: row.high_descriptor,
			created_at: row.created_at,
			accepted_at: row.accepted_at,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FriendsResponse {
	pub profile_key: String,
	pub friends: Vec<FriendItem>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FriendItem {
	pub profile_key: String,
	pub first_name: String,
	pub last_name: String,
}

pub struct ConnectionGraph<'a, S>
where
	S: ?Sized,
{
	store: &'a S,
}
impl<'a, S> ConnectionGraph<'a, S>
where
	S: ?Sized + ConnectionStore,
{
	pub fn new(store: &'a S) -> Self {
		Self { store }
	}

	pub async fn exists(&self, a: &str, b: &str) -> ServiceResult<ConnectionStatus> {
		let pair = pair_of(a, b)?;
		let status = match self.store.get_connection(&pair).await? {
			None => ConnectionStatus::None,
			Some(row) if row.accepted => ConnectionStatus::Accepted { initiator: row.initiator_key },
			Some(row) => ConnectionStatus::Pending { initiator: row.initiator_key },
		};

		Ok(status)
	}

	/// Accepted neighbours of `profile_key`, sorted by key.
	pub async fn neighbors(&self, profile_key: &str) -> ServiceResult<Vec<String>> {
		check_key("profile_key", profile_key)?;

		let mut keys = self.store.neighbor_keys(profile_key).await?;

		keys.retain(|key| key != profile_key);

		Ok(keys)
	}

	/// Records a pending request from `from` to `to`.
	///
	/// Fails with `Conflict` when the pair already has a row, whichever side created it.
	pub async fn request(
		&self,
		from: &str,
		to: &str,
		from_descriptor: &str,
		to_descriptor: &str,
	) -> ServiceResult<Connection> {
		let pair = pair_of(from, to)?;

		if self.store.get_connection(&pair).await?.is_some() {
			return Err(ServiceError::conflict(format!("connection between {from} and {to} exists")));
		}

		let (low_descriptor, high_descriptor) = pair.orient(from, from_descriptor, to_descriptor);
		let row =
			self.store.insert_connection(&pair, from, low_descriptor, high_descriptor).await?;

		tracing::info!(from, to, "Connection requested.");

		Ok(row)
	}

	/// Accepts a pending request. Accepting an accepted pair is a no-op.
	pub async fn accept(&self, acceptor: &str, requester: &str) -> ServiceResult<()> {
		let pair = pair_of(acceptor, requester)?;
		let Some(row) = self.store.get_connection(&pair).await? else {
			return Err(ServiceError::not_found(format!(
				"no request between {acceptor} and {requester}"
			)));
		};

		if row.accepted {
			tracing::debug!(acceptor, requester, "Connection already accepted.");

			return Ok(());
		}
		if row.initiator_key == acceptor {
			return Err(ServiceError::invalid("A request cannot be accepted by its initiator."));
		}
		if !self.store.set_accepted(&pair).await? {
			return Err(ServiceError::not_found(format!(
				"no request between {acceptor} and {requester}"
			)));
		}

		tracing::info!(acceptor, requester, "Connection accepted.");

		Ok(())
	}

	/// Removes the pair whatever its state. Used for unfriend, decline and withdraw alike.
	pub async fn delete(&self, a: &str, b: &str) -> ServiceResult<()> {
		let pair = pair_of(a, b)?;

		if !self.store.delete_connection(&pair).await? {
			return Err(ServiceError::not_found(format!("no connection between {a} and {b}")));
		}

		tracing::info!(a, b, "Connection deleted.");

		Ok(())
	}

	/// Replaces both descriptors, given from `a`'s point of view.
	pub async fn modify(
		&self,
		a: &str,
		b: &str,
		a_descriptor: &str,
		b_descriptor: &str,
	) -> ServiceResult<()> {
		let pair = pair_of(a, b)?;
		let (low_descriptor, high_descriptor) = pair.orient(a, a_descriptor, b_descriptor);

		if !self.store.update_descriptors(&pair, low_descriptor, high_descriptor).await? {
			return Err(ServiceError::not_found(format!("no connection between {a} and {b}")));
		}

		Ok(())
	}
}

pub(crate) fn check_key(field: &str, key: &str) -> ServiceResult<()> {
	profile::check_profile_key(key).map_err(|code| ServiceError::bad_key(field, code))
}

fn pair_of(a: &str, b: &str) -> ServiceResult<ConnectionPair> {
	check_key("a", a)?;
	check_key("b", b)?;

	ConnectionPair::new(a, b)
		.ok_or_else(|| ServiceError::invalid("A profile cannot connect to itself."))
}

impl AmityService {
	pub fn graph(&self) -> ConnectionGraph<'_, dyn Store> {
		ConnectionGraph::new(self.store.as_ref())
	}

	pub async fn connection_request(&self, req: ConnectionRequest) -> ServiceResult<ConnectionView> {
		let row = self
			.graph()
			.request(req.from.trim(), req.to.trim(), &req.from_descriptor, &req.to_descriptor)
			.await?;

		Ok(row.into())
	}

	pub async fn connection_accept(&self, req: AcceptRequest) -> ServiceResult<()> {
		self.graph().accept(req.acceptor.trim(), req.requester.trim()).await
	}

	pub async fn connection_delete(&self, req: PairRequest) -> ServiceResult<()> {
		self.graph().delete(req.a.trim(), req.b.trim()).await
	}

	pub async fn connection_modify(&self, req: ConnectionRequest) -> ServiceResult<()> {
		self.graph()
			.modify(req.from.trim(), req.to.trim(), &req.from_descriptor, &req.to_descriptor)
			.await
	}

	pub async fn connection_status(&self, req: PairRequest) -> ServiceResult<ConnectionStatus> {
		self.graph().exists(req.a.trim(), req.b.trim()).await
	}

	pub async fn friends(&self, profile_key: &str) -> ServiceResult<FriendsResponse> {
		let profile_key = profile_key.trim();
		let keys = self.graph().neighbors(profile_key).await?;
		let rows = self.store.list_profiles_by_keys(&keys).await?;
		let friends = rows
			.into_iter()
			.map(|row| FriendItem {
				profile_key: row.profile_key,
				first_name: row.first_name,
				last_name: row.last_name,
			})
			.collect();

		Ok(FriendsResponse { profile_key: profile_key.to_string(), friends })
	}
}
