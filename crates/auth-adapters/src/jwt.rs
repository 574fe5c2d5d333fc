//! HS256 JSON Web Tokens implementing `TokenService`.
//!
//! The payload carries the user under `usuario` together with `iat` and `exp`.

use chrono::{Duration, Utc};
use domains::{DomainError, Identity, Result, TokenService};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    usuario: Identity,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    /// `secret` is shared by signing and verification; there is no rotation.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            usuario: identity.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(DomainError::internal)
    }

    fn verify(&self, token: &str) -> Result<Identity> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "token rejected");
            DomainError::Unauthorized(err.to_string())
        })?;
        Ok(data.claims.usuario)
    }
}
