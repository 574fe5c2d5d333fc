//! JSON bodies returned by the `/api/v1/*` endpoints.

use serde::{Deserialize, Serialize};

/// `{code, message}`: every outcome except a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub code: u16,
    pub message: String,
}

impl MessageEnvelope {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// `{code, token}`: a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEnvelope {
    pub code: u16,
    pub token: String,
}
