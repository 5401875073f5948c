//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `RecordStore`
//! trait defined in `warden_core::storage`. The implementations are
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): In-memory document store

#[cfg(not(feature = "inmemory"))]
compile_error!(
    "No storage backend selected. Enable the 'inmemory' feature. \
    Example: cargo build -p warden --features inmemory"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "inmemory")]
pub use inmemory::{InMemoryStore, RelationResolver, DEFAULT_PER_PAGE};
