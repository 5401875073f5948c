use async_trait::async_trait;

use super::{AuthContext, AuthError};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Abstraction over the one-time password library.
#[async_trait]
pub trait OtpVerifier: Send + Sync {
    /// Whether OTP verification is switched on at all.
    fn is_enabled(&self) -> bool;

    /// Whether an earlier successful verification still covers `context`.
    async fn verification_still_valid(&self, context: &AuthContext) -> Result<bool>;
}
