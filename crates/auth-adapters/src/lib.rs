//! # auth-adapters
//!
//! Credential and token implementations of the `domains` ports.

#[cfg(feature = "auth-jwt")]
pub mod jwt;
pub mod password;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
pub use password::Argon2Hasher;
