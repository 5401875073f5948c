mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{is_verification_still_valid, otp_challenge_waived, resolve_otp_secret};
pub use traits::{OtpVerifier, Result};
pub use types::{AuthContext, PasswordSecurity, Principal, Profile, SessionId};
