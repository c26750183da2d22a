//! # storage-adapters
//!
//! Implementations of the repository ports in `domains`.
//! Each backend lives behind a cargo feature so the binary only compiles the
//! store it ships with.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
