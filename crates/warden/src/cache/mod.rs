//! Cache backend implementations and helpers.
//!
//! This module provides concrete implementations of the cache trait
//! defined in `warden_core::cache`, selected at compile time via feature
//! flags, plus the get-or-compute [`remember`] helper.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory LRU cache using tokio synchronization primitives

#[cfg(not(feature = "memory"))]
compile_error!(
    "No cache backend selected. Enable the 'memory' feature. \
    Example: cargo build -p warden --features memory"
);

#[cfg(feature = "memory")]
pub mod memory;

mod remember;

#[cfg(feature = "memory")]
pub use memory::MemoryCache;
pub use remember::remember;
