use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use warden_core::cache::{deserialize_value, serialize_value, Cache};

/// Returns the cached value under `key`, or computes, caches and returns it.
///
/// Cache failures never fail the call: a read error or an undecodable value
/// counts as a miss, and a write error only skips caching. Errors from
/// `compute` propagate and leave the cache untouched.
pub async fn remember<C, T, E, F, Fut>(
    cache: &C,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T, E>
where
    C: Cache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cache.get(key).await {
        Ok(Some(bytes)) => match deserialize_value(&bytes) {
            Ok(value) => {
                tracing::trace!(key, "Cache hit");
                return Ok(value);
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cached value deserialization failed");
            }
        },
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache read failed");
        }
    }

    tracing::trace!(key, "Cache miss");
    let value = compute().await?;

    match serialize_value(&value) {
        Ok(bytes) => {
            if let Err(err) = cache.set(key, &bytes, Some(ttl)).await {
                tracing::warn!(key, error = %err, "Failed to cache value");
            }
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "Value serialization failed");
        }
    }

    Ok(value)
}
