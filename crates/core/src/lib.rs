//! Core types, contracts and pure rules for warden.
//!
//! Nothing in this crate performs I/O. Storage, cache and OTP verification
//! are described as traits; the `warden` and `warden_auth` crates provide
//! the implementations.

pub mod auth;
pub mod cache;
pub mod repository;
pub mod storage;
