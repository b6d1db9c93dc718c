pub mod cascade;
pub mod connection;
pub mod feed;
pub mod profile;
pub mod reaction;
pub mod term;
