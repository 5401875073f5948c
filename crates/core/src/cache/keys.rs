use uuid::Uuid;

/// Returns the cache key for a single record looked up by identifier.
///
/// Record identifiers are UUIDs and unique across entity types, so the
/// key is the hyphenated identifier itself.
pub fn record_key(id: Uuid) -> String {
    id.hyphenated().to_string()
}
