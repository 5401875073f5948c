//! In-memory storage backend for tests and single-process use.

mod repository;

pub use repository::{InMemoryStore, RelationResolver, DEFAULT_PER_PAGE};
