//! # DomainError
//!
//! Centralized error handling for the Gaceta crates.
//! Adapters translate their own failures (sqlx, I/O, jsonwebtoken, argon2)
//! into one of these variants before handing them to the services layer.

use thiserror::Error;

/// The primary error type for every port and service operation.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g., Post, Category)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Validation failure (e.g., missing field, upload is not an image)
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential or token failure
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g., duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., database unreachable, disk full)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A specialized Result type for Gaceta domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
