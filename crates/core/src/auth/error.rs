use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Secret key cannot be empty")]
    EmptySecret,

    #[error("storage error: {0}")]
    Storage(String),
}
