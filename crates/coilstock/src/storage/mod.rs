//! Storage backend implementations.
//!
//! Concrete implementations of `coilstock_core::storage::CoilRepository`.
//! The SQLite backend is the production store; the in-memory backend backs
//! tests and `--in-memory` runs. The backend is chosen at startup when the
//! application state is constructed.

pub mod inmemory;
pub mod sqlite;

pub use inmemory::InMemoryRepository;
pub use sqlite::SqliteRepository;
