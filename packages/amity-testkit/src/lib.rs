//! Scratch Postgres databases for the `#[ignore]`d storage and service tests.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use amity_config::Postgres;

const DSN_ENV: &str = "AMITY_PG_DSN";
const MAINTENANCE_DB: &str = "postgres";
const FALLBACK_MAINTENANCE_DB: &str = "template1";

/// One empty database per test, named `amity_test_<uuid>`.
///
/// `cleanup` drops it. A test that panics first leaves that to `Drop`, which runs the drop on a
/// helper thread with its own runtime.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// Creates a database on the server named by `AMITY_PG_DSN`, or returns `None` (after
	/// saying so on stderr) when the variable is unset.
	pub async fn from_env(test: &str) -> Result<Option<Self>> {
		let Some(base_dsn) = env_dsn() else {
			eprintln!("Skipping {test}; set {DSN_ENV} to run.");

			return Ok(None);
		};

		Self::create(&base_dsn).await.map(Some)
	}

	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn).map_err(Error::InvalidDsn)?;
		let (maintenance, mut conn) = connect_maintenance(&base).await?;
		let name = format!("amity_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::Create { name: name.clone(), source })?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Storage settings pointing at this database.
	pub fn postgres(&self, pool_max_conns: u32) -> Postgres {
		Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		let helper = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime
						.block_on(drop_database(&name, &maintenance))
						.map_err(|err| err.to_string())
				});

			if let Err(err) = result {
				eprintln!("Leaked test database {name}: {err}.");
			}
		});
		let _ = helper.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok()
}

async fn connect_maintenance(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let primary = base.clone().database(MAINTENANCE_DB);

	if let Ok(conn) = PgConnection::connect_with(&primary).await {
		return Ok((primary, conn));
	}

	let fallback = base.clone().database(FALLBACK_MAINTENANCE_DB);
	let conn = PgConnection::connect_with(&fallback).await.map_err(Error::Unreachable)?;

	Ok((fallback, conn))
}

async fn drop_database(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let drop_err = |source| Error::Drop { name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(maintenance).await.map_err(drop_err)?;

	// FORCE ends sessions a leaked pool still holds open.
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str())
		.await
		.map_err(drop_err)?;

	Ok(())
}
