//! In-memory storage backend, used by tests and `--in-memory` runs.

mod repository;

pub use repository::InMemoryRepository;
