//! JWT token generation and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;
use crate::config::JwtConfig;
use crate::types::{CompanyId, UserId};

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    access_token_expiry_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_token_expiry_secs: i64::try_from(config.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Generates an access token for a user, valid from `now`.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(
        &self,
        user_id: UserId,
        company_id: CompanyId,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expires_at = now + Duration::seconds(self.access_token_expiry_secs);
        let claims = Claims::new(user_id, company_id, now, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed or the signature is wrong.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the access token lifetime in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expiry_secs: 900,
        })
    }

    #[test]
    fn test_generate_and_validate_token() {
        let service = create_test_service();
        let user_id = UserId::new();
        let company_id = CompanyId::new();

        let token = service
            .generate_access_token(user_id, company_id, Utc::now())
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.company_id(), company_id);
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::hours(2);
        let token = service
            .generate_access_token(UserId::new(), CompanyId::new(), issued)
            .unwrap();

        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = create_test_service();
        let other = JwtService::new(&JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expiry_secs: 900,
        });
        let token = other
            .generate_access_token(UserId::new(), CompanyId::new(), Utc::now())
            .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }
}
