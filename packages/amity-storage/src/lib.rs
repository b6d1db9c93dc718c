pub mod comments;
pub mod connections;
pub mod db;
pub mod models;
pub mod posts;
pub mod profiles;
pub mod reactions;
pub mod schema;
pub mod search_history;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
