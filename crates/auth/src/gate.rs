//! Decides when a one-time password challenge can be skipped.

use std::sync::Arc;

use warden_core::auth::{
    otp_challenge_waived, resolve_otp_secret, AuthContext, OtpVerifier, Principal, Result,
};

/// OTP gate in front of the second authentication factor.
pub struct TwoFactorGate<V: OtpVerifier> {
    verifier: Arc<V>,
}

impl<V: OtpVerifier> Clone for TwoFactorGate<V> {
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<V: OtpVerifier> TwoFactorGate<V> {
    pub fn new(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// Returns true if `principal` may continue without an OTP challenge.
    ///
    /// The verifier is only asked about earlier verifications once the
    /// principal's settings, the global switch and the authentication state
    /// all call for a challenge.
    pub async fn can_bypass(&self, principal: &Principal, context: &AuthContext) -> Result<bool> {
        if otp_challenge_waived(principal, self.verifier.is_enabled(), context) {
            tracing::trace!(principal_id = %principal.id, "OTP challenge waived");
            return Ok(true);
        }

        let still_valid = self.verifier.verification_still_valid(context).await?;
        if still_valid {
            tracing::trace!(principal_id = %principal.id, "Earlier OTP verification still valid");
        } else {
            tracing::debug!(principal_id = %principal.id, "OTP challenge required");
        }
        Ok(still_valid)
    }

    /// Returns the principal's OTP secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptySecret` when the secret is missing or empty.
    pub fn resolve_secret(&self, principal: &Principal) -> Result<String> {
        resolve_otp_secret(principal).inspect_err(|err| {
            tracing::warn!(principal_id = %principal.id, error = %err, "OTP secret unavailable");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;
    use warden_core::auth::{AuthError, SessionId};

    struct StubVerifier {
        enabled: bool,
        still_valid: std::result::Result<bool, AuthError>,
        checks: AtomicUsize,
    }

    impl StubVerifier {
        fn new(enabled: bool, still_valid: bool) -> Self {
            Self {
                enabled,
                still_valid: Ok(still_valid),
                checks: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                enabled: true,
                still_valid: Err(AuthError::Storage("backend down".to_string())),
                checks: AtomicUsize::new(0),
            }
        }

        fn checks(&self) -> usize {
            self.checks.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OtpVerifier for StubVerifier {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn verification_still_valid(&self, _context: &AuthContext) -> Result<bool> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.still_valid.clone()
        }
    }

    fn gate(verifier: StubVerifier) -> (TwoFactorGate<StubVerifier>, Arc<StubVerifier>) {
        let verifier = Arc::new(verifier);
        (TwoFactorGate::new(Arc::clone(&verifier)), verifier)
    }

    fn otp_principal() -> Principal {
        Principal::new(Uuid::new_v4()).with_password_security(true)
    }

    fn logged_in(principal: &Principal) -> AuthContext {
        AuthContext::authenticated(principal.clone()).with_session(SessionId::new("session-1"))
    }

    #[tokio::test]
    async fn bypass_without_password_security_regardless_of_anything_else() {
        let principal = Principal::new(Uuid::new_v4()).with_otp_secret("SECRET");
        let (gate, verifier) = gate(StubVerifier::new(true, false));

        assert!(gate.can_bypass(&principal, &logged_in(&principal)).await.unwrap());
        assert!(gate.can_bypass(&principal, &AuthContext::anonymous()).await.unwrap());
        assert_eq!(verifier.checks(), 0);
    }

    #[tokio::test]
    async fn bypass_when_principal_has_otp_switched_off() {
        let principal = Principal::new(Uuid::new_v4()).with_password_security(false);
        let (gate, _) = gate(StubVerifier::new(true, false));

        assert!(gate.can_bypass(&principal, &logged_in(&principal)).await.unwrap());
    }

    #[tokio::test]
    async fn bypass_when_otp_disabled_globally() {
        let principal = otp_principal();
        let (gate, verifier) = gate(StubVerifier::new(false, false));

        assert!(gate.can_bypass(&principal, &logged_in(&principal)).await.unwrap());
        assert_eq!(verifier.checks(), 0);
    }

    #[tokio::test]
    async fn bypass_when_nobody_is_authenticated() {
        let principal = otp_principal();
        let (gate, _) = gate(StubVerifier::new(true, false));

        assert!(gate.can_bypass(&principal, &AuthContext::anonymous()).await.unwrap());
    }

    #[tokio::test]
    async fn bypass_when_earlier_verification_still_valid() {
        let principal = otp_principal();
        let (gate, verifier) = gate(StubVerifier::new(true, true));

        assert!(gate.can_bypass(&principal, &logged_in(&principal)).await.unwrap());
        assert_eq!(verifier.checks(), 1);
    }

    #[tokio::test]
    async fn challenge_required_otherwise() {
        let principal = otp_principal();
        let (gate, verifier) = gate(StubVerifier::new(true, false));

        assert!(!gate.can_bypass(&principal, &logged_in(&principal)).await.unwrap());
        assert_eq!(verifier.checks(), 1);
    }

    #[tokio::test]
    async fn verifier_errors_propagate() {
        let principal = otp_principal();
        let (gate, _) = gate(StubVerifier::failing());

        let result = gate.can_bypass(&principal, &logged_in(&principal)).await;
        assert!(matches!(result, Err(AuthError::Storage(_))));
    }

    #[test]
    fn resolve_secret_returns_stored_value() {
        let principal = Principal::new(Uuid::new_v4()).with_otp_secret("JBSWY3DPEHPK3PXP");
        let (gate, _) = gate(StubVerifier::new(true, false));

        assert_eq!(gate.resolve_secret(&principal).unwrap(), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn resolve_secret_fails_for_empty_secret() {
        let principal = Principal::new(Uuid::new_v4()).with_otp_secret("");
        let (gate, _) = gate(StubVerifier::new(true, false));

        assert_eq!(gate.resolve_secret(&principal), Err(AuthError::EmptySecret));
    }

    #[test]
    fn resolve_secret_fails_without_profile() {
        let principal = Principal::new(Uuid::new_v4());
        let (gate, _) = gate(StubVerifier::new(true, false));

        assert_eq!(gate.resolve_secret(&principal), Err(AuthError::EmptySecret));
    }
}
