//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! Ownership violations stay distinct from missing records: callers see 403
//! for a record they may not read and 404 for one that does not exist.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Forbidden` -> 403 (Forbidden)
/// - `Persistence` -> 500 (Internal Server Error)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use warden_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::forbidden("Post", "abc-123");
/// assert_eq!(repository_error_to_status_code(&error), 403);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Forbidden { .. } => 403,
        RepositoryError::Persistence(_) => 500,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
    }
}
