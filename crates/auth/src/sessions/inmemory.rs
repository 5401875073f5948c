//! In-memory OTP verification store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use warden_core::auth::{
    is_verification_still_valid, AuthContext, OtpVerifier, Result, SessionId,
};

use crate::config::OtpConfig;

/// Remembers when each session last completed an OTP challenge.
///
/// Stores verification timestamps in a HashMap wrapped in `Arc<RwLock<_>>`.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct VerificationStore {
    config: OtpConfig,
    verified: Arc<RwLock<HashMap<SessionId, DateTime<Utc>>>>,
}

impl Default for VerificationStore {
    fn default() -> Self {
        Self::new(OtpConfig::default())
    }
}

impl VerificationStore {
    /// Creates a new empty verification store.
    pub fn new(config: OtpConfig) -> Self {
        Self {
            config,
            verified: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records that `session` passed an OTP challenge at `at`.
    pub async fn record_verification(&self, session: &SessionId, at: DateTime<Utc>) {
        let mut verified = self.verified.write().await;
        verified.insert(session.clone(), at);
        tracing::debug!(session_id = %session, "OTP verification recorded");
    }

    /// Forgets any verification for `session`, e.g. on logout.
    pub async fn forget(&self, session: &SessionId) {
        let mut verified = self.verified.write().await;
        verified.remove(session);
    }

    /// When `session` last passed (or was kept alive).
    pub async fn verified_at(&self, session: &SessionId) -> Option<DateTime<Utc>> {
        let verified = self.verified.read().await;
        verified.get(session).copied()
    }

    async fn check_at(&self, context: &AuthContext, now: DateTime<Utc>) -> bool {
        let Some(session) = context.session_id() else {
            return false;
        };

        let mut verified = self.verified.write().await;
        let Some(at) = verified.get_mut(session) else {
            return false;
        };

        if is_verification_still_valid(*at, self.config.lifetime(), now) {
            if self.config.keep_alive {
                *at = now;
            }
            return true;
        }

        verified.remove(session);
        tracing::debug!(session_id = %session, "OTP verification expired");
        false
    }
}

#[async_trait]
impl OtpVerifier for VerificationStore {
    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    async fn verification_still_valid(&self, context: &AuthContext) -> Result<bool> {
        Ok(self.check_at(context, Utc::now()).await)
    }
}
