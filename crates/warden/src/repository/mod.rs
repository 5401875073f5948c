mod entity;

pub use entity::{EntityRepository, DEFAULT_CACHE_TTL};
