//! Bearer token decoding and signature verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

/// Token validation boundary used by the HTTP layer.
///
/// Trait-shaped so the API can be wired against a stub in tests or swapped
/// to a different signing scheme without touching the middleware.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HS256 (shared secret) validator.
pub struct Hs256JwtValidator {
    decoding_key: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(&secret),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        // The time window lives in our own claims (RFC3339 timestamps), so
        // the library's numeric `exp` handling is disabled and the window is
        // checked deterministically by `validate_claims`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
