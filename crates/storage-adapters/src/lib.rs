//! # storage-adapters
//!
//! Persistence implementations of the `domains` ports: a SQLite store for
//! every repository and a local-disk store for post images.

#[cfg(feature = "media-local")]
pub mod media;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "media-local")]
pub use media::LocalMediaStore;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
