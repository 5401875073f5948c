use chrono::Duration;

/// One-time password configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpConfig {
    /// Global switch; when false every principal bypasses OTP.
    pub enabled: bool,
    /// Minutes a successful verification stays valid. `0` never expires.
    pub lifetime_minutes: u64,
    /// Refresh the verification timestamp whenever it is found valid.
    pub keep_alive: bool,
}

impl OtpConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTP_ENABLED`: Whether OTP verification is switched on (default: true)
    /// - `OTP_LIFETIME_MINUTES`: Verification lifetime, 0 for no expiry (default: 0)
    /// - `OTP_KEEP_ALIVE`: Refresh verification on activity (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| v == "true" || v == "1");

        Self {
            enabled: flag("OTP_ENABLED").unwrap_or(true),
            lifetime_minutes: lookup("OTP_LIFETIME_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            keep_alive: flag("OTP_KEEP_ALIVE").unwrap_or(true),
        }
    }

    /// Verification lifetime as a duration.
    pub fn lifetime(&self) -> Duration {
        i64::try_from(self.lifetime_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lifetime_minutes: 0,
            keep_alive: true,
        }
    }
}
