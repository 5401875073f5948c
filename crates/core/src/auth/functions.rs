use chrono::{DateTime, Duration, Utc};

use super::{AuthContext, AuthError, Principal, Result};

/// Cheap part of the OTP bypass decision, everything except asking the
/// verifier whether an earlier verification is still valid.
///
/// Returns true when the principal has no password security settings, has
/// not opted into OTP, OTP is switched off globally, or nobody is logged in.
pub fn otp_challenge_waived(
    principal: &Principal,
    verifier_enabled: bool,
    context: &AuthContext,
) -> bool {
    let Some(security) = principal.password_security else {
        return true;
    };

    !security.otp_enabled || !verifier_enabled || !context.is_authenticated()
}

/// Reads the OTP secret from the principal's profile.
///
/// A missing profile, a missing secret and an empty secret are all
/// rejected with [`AuthError::EmptySecret`].
pub fn resolve_otp_secret(principal: &Principal) -> Result<String> {
    principal
        .profile
        .as_ref()
        .and_then(|profile| profile.otp_secret.as_deref())
        .filter(|secret| !secret.is_empty())
        .map(str::to_string)
        .ok_or(AuthError::EmptySecret)
}

/// Check if a past OTP verification still covers `now`.
///
/// A zero (or negative) lifetime means a verification never expires.
pub fn is_verification_still_valid(
    verified_at: DateTime<Utc>,
    lifetime: Duration,
    now: DateTime<Utc>,
) -> bool {
    if lifetime <= Duration::zero() {
        return true;
    }
    verified_at
        .checked_add_signed(lifetime)
        .is_none_or(|expires_at| now < expires_at)
}
