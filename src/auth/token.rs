//! Session token codec
//!
//! Issues and verifies the signed, time-limited tokens carried in the
//! session cookie. Verification is a pure function of token + secret +
//! clock and never touches the credential store.

use crate::auth::models::{Identity, Role};
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of the short-lived OAuth state payload
const STATE_TTL_SECS: i64 = 600;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (role-specific user id)
    pub sub: i64,
    /// Account email
    pub email: String,
    /// Role of the matched credential table
    pub role: Role,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Claims signed into the OAuth `state` query parameter
#[derive(Debug, Serialize, Deserialize)]
pub struct StateClaims {
    /// Role requested at the start of the consent flow
    pub role: Role,
    /// Expiration time
    pub exp: i64,
}

/// Signs and verifies session tokens with a shared secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_days: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_days,
        }
    }

    /// Issue a signed session token for a resolved identity
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            iat: now,
            exp: now + self.ttl_days * 24 * 60 * 60,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify a session token, rejecting bad signatures, expiry and
    /// structurally malformed input uniformly as `TokenInvalid`
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                Error::TokenInvalid
            })
    }

    /// Sign the OAuth state payload carrying the requested role
    pub fn sign_state(&self, role: Role) -> Result<String> {
        let claims = StateClaims {
            role,
            exp: chrono::Utc::now().timestamp() + STATE_TTL_SECS,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify the OAuth state payload and recover the requested role
    pub fn verify_state(&self, state: &str) -> Result<Role> {
        decode::<StateClaims>(state, &self.decoding_key, &self.validation)
            .map(|data| data.claims.role)
            .map_err(|e| {
                tracing::debug!("OAuth state rejected: {}", e);
                Error::TokenInvalid
            })
    }

    pub fn ttl_days(&self) -> i64 {
        self.ttl_days
    }
}
