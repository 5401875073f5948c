use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Forbidden: {entity_type} {id} belongs to another user")]
    Forbidden {
        entity_type: &'static str,
        id: String,
    },
    #[error("Persistence failed: {0}")]
    Persistence(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Builds a `NotFound` error for the given entity type.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Builds a `Forbidden` error for the given entity type.
    pub fn forbidden(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Forbidden {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
