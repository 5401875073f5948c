//! Session-keyed OTP verification bookkeeping.

mod inmemory;

pub use inmemory::VerificationStore;
