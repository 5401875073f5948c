//! One-time password gate for warden.
//!
//! This crate provides:
//! - `TwoFactorGate`, deciding when an OTP challenge can be skipped
//! - `VerificationStore`, an in-memory session-keyed OTP verifier
//! - `OtpConfig`, loaded from the environment

mod config;
mod gate;
mod sessions;

pub use config::OtpConfig;
pub use gate::TwoFactorGate;
pub use sessions::VerificationStore;
