//! # storage-adapters
//!
//! Implementations of the `BuildRepository` and `MediaStorage` ports.
//! Heavier backends are compiled in by feature:
//!
//! - `db-sqlite`: durable SQLite store
//! - `media-local`: content-addressed files on local disk

pub mod media;
pub mod memory;
pub mod seed;
#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use media::InlineMediaStorage;
#[cfg(feature = "media-local")]
pub use media::LocalMediaStorage;
pub use memory::InMemoryBuildRepository;
#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteBuildRepository;
