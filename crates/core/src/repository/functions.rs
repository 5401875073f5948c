//! Pure rules behind single-record lookups.

use uuid::{fmt::Hyphenated, Uuid};

use crate::auth::AuthContext;

use super::RepositoryConfig;

/// Parses a raw identifier, returning `None` unless it is a well-formed UUID.
///
/// Accepts the hyphenated form, optionally braced or behind a `urn:uuid:`
/// prefix. The 32-digit simple form is rejected.
pub fn parse_record_id(raw: &str) -> Option<Uuid> {
    let bare = raw
        .strip_prefix("urn:uuid:")
        .or_else(|| raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
        .unwrap_or(raw);

    if bare.len() != Hyphenated::LENGTH {
        return None;
    }
    Uuid::try_parse(bare).ok()
}

/// Whether an identifier lookup may be served from the shared cache.
///
/// Eager relations and authenticated callers always go to the store: the
/// cached value carries no relations and was loaded without an ownership
/// check against the caller.
pub fn uses_identifier_cache(config: &RepositoryConfig, context: &AuthContext) -> bool {
    !config.has_includes() && !context.is_authenticated()
}

/// Whether the authenticated caller is reading a record owned by someone else.
///
/// Unowned records and unauthenticated callers never violate ownership.
pub fn is_ownership_violation(owner: Option<Uuid>, context: &AuthContext) -> bool {
    match (owner, context.principal_id()) {
        (Some(owner), Some(caller)) => owner != caller,
        _ => false,
    }
}
