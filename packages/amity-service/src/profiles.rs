use time::{Date, OffsetDateTime};

use amity_storage::models::{Profile, ProfileFields};

use crate::{AmityService, ServiceError, ServiceResult, graph::check_key};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProfileRequest {
	/// Taken from the path on updates.
	#[serde(default)]
	pub profile_key: String,
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default, with = "crate::time_serde::date_option")]
	pub dob: Option<Date>,
	#[serde(default)]
	pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProfileResponse {
	pub profile_key: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	#[serde(with = "crate::time_serde::date_option")]
	pub dob: Option<Date>,
	pub bio: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Profile> for ProfileResponse {
	fn from(row: Profile) -> Self {
		Self {
			profile_key: row.profile_key,
			first_name: row.first_name,
			last_name: row.last_name,
			email: row.email,
			dob: row.dob,
			bio: row.bio,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExistsResponse {
	pub exists: bool,
}

impl ProfileRequest {
	fn fields(&self) -> ServiceResult<ProfileFields> {
		let first_name = self.first_name.trim();

		if first_name.is_empty() {
			return Err(ServiceError::invalid("first_name is required."));
		}

		Ok(ProfileFields {
			first_name: first_name.to_string(),
			last_name: self.last_name.trim().to_string(),
			email: self.email.trim().to_string(),
			dob: self.dob,
			bio: self.bio.trim().to_string(),
		})
	}
}

impl AmityService {
	pub async fn profile_create(&self, req: ProfileRequest) -> ServiceResult<ProfileResponse> {
		let profile_key = req.profile_key.trim();

		check_key("profile_key", profile_key)?;

		let fields = req.fields()?;
		let row = self.store.insert_profile(profile_key, &fields).await?;

		tracing::info!(profile_key, "Profile created.");

		Ok(row.into())
	}

	pub async fn profile_get(&self, profile_key: &str) -> ServiceResult<ProfileResponse> {
		let profile_key = profile_key.trim();

		check_key("profile_key", profile_key)?;

		self.store
			.get_profile(profile_key)
			.await?
			.map(ProfileResponse::from)
			.ok_or_else(|| ServiceError::not_found(format!("profile {profile_key}")))
	}

	/// Replaces the mutable fields. The key cannot change.
	pub async fn profile_update(&self, req: ProfileRequest) -> ServiceResult<ProfileResponse> {
		let profile_key = req.profile_key.trim();

		check_key("profile_key", profile_key)?;

		let fields = req.fields()?;

		self.store
			.update_profile(profile_key, &fields)
			.await?
			.map(ProfileResponse::from)
			.ok_or_else(|| ServiceError::not_found(format!("profile {profile_key}")))
	}

	/// Deletes the profile with its connections, posts, comments, reactions and search history.
	pub async fn profile_delete(&self, profile_key: &str) -> ServiceResult<()> {
		let profile_key = profile_key.trim();

		check_key("profile_key", profile_key)?;

		if !self.store.delete_profile(profile_key).await? {
			return Err(ServiceError::not_found(format!("profile {profile_key}")));
		}

		tracing::info!(profile_key, "Profile deleted.");

		Ok(())
	}

	pub async fn profile_exists(&self, profile_key: &str) -> ServiceResult<ExistsResponse> {
		let profile_key = profile_key.trim();

		check_key("profile_key", profile_key)?;

		Ok(ExistsResponse { exists: self.store.profile_exists(profile_key).await? })
	}
}
