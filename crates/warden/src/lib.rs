//! Cached, ownership-checked entity repositories.
//!
//! [`EntityRepository`] sits on top of any `RecordStore` and `Cache` from
//! `warden_core`. The in-memory backends in [`storage`] and [`cache`] are
//! enough to run it without external services.

pub mod cache;
pub mod config;
pub mod logging;
pub mod repository;
pub mod storage;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use warden_core::storage::Record;

pub use config::{Config, LogFormat};
pub use repository::EntityRepository;

/// Repository backed by the in-memory store and cache.
pub type InMemoryRepository<T> = EntityRepository<T, storage::InMemoryStore<T>, cache::MemoryCache>;

/// Builds an in-memory repository sized and timed from `config`.
pub fn in_memory_repository<T: Record>(config: &Config) -> InMemoryRepository<T> {
    let store = storage::InMemoryStore::new().with_per_page(config.page_size);
    let cache = cache::MemoryCache::new(config.cache_max_entries);

    EntityRepository::new(Arc::new(store), Arc::new(cache)).with_cache_ttl(config.cache_ttl())
}
