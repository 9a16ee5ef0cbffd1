//! Session token service.
//!
//! Issues and verifies signed, time-limited bearer tokens (HS256 JWTs).
//! Tokens carry the user ID as the subject and expire after 30 days.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cartwheel_core::UserId;

/// Session token lifetime: 30 days.
const TOKEN_TTL_DAYS: i64 = 30;

/// Errors from issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed (key or serialization problem).
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, tampered with, or expired.
    #[error("invalid or expired token")]
    Invalid,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: i32,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies session tokens with a shared signing secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for a user, valid for 30 days.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_i32(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify a token and return the user ID it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any malformed, tampered, or expired
    /// token. The cause is deliberately not distinguished for callers.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        Ok(UserId::new(data.claims.sub))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from(
            "test-signing-secret-0123456789abcdef".to_owned(),
        ))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = service();
        let token = tokens.issue(UserId::new(42)).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), UserId::new(42));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service();
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue(UserId::new(1)).unwrap();
        let other = TokenService::new(&SecretString::from(
            "another-signing-secret-fedcba98765432".to_owned(),
        ));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: 1,
            iat: (now - Duration::days(31)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret-0123456789abcdef"),
        )
        .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid)));
    }
}
