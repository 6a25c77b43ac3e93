pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Fixed role carried by every issued token.
pub const USER_ROLE: &str = "User";

/// Absolute token lifetime from the moment of issuance.
pub const TOKEN_LIFETIME_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    /// Numeric user id, carried as a string claim.
    pub nameidentifier: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity a token is issued for, after a successful credential check.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: i32,
    pub user_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token issuer is not accepted")]
    InvalidIssuer,

    #[error("token audience is not accepted")]
    InvalidAudience,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token generation failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
            ErrorKind::InvalidAudience => TokenError::InvalidAudience,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Issues and validates the stateless bearer tokens used by protected routes.
///
/// Tokens are HS256-signed with the configured key and bound to the
/// configured issuer and audience. No server-side registry of issued tokens
/// exists: a token is valid exactly when its signature and claims check out.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[security.jwt_issuer.as_str()]);
        validation.set_audience(&[security.jwt_audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(security.jwt_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_key.as_bytes()),
            validation,
            issuer: security.jwt_issuer.clone(),
            audience: security.jwt_audience.clone(),
        }
    }

    pub fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &TokenSubject, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            name: subject.user_name.clone(),
            email: subject.email.clone(),
            role: USER_ROLE.to_string(),
            nameidentifier: subject.user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_LIFETIME_MINUTES)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature, issuer, audience and expiry; return the embedded claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn service() -> TokenService {
        TokenService::new(&AppConfig::development().security)
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: 42,
            user_name: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[test]
    fn issued_token_carries_identity_claims() {
        let tokens = service();
        let token = tokens.issue(&subject()).unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.name, "alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.role, USER_ROLE);
        assert_eq!(claims.nameidentifier, "42");
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_MINUTES * 60);
    }

    #[test]
    fn token_past_lifetime_is_expired() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(TOKEN_LIFETIME_MINUTES + 1);
        let token = tokens.issue_at(&subject(), issued).unwrap();

        assert_eq!(tokens.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_inside_lifetime_is_accepted() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(TOKEN_LIFETIME_MINUTES - 1);
        let token = tokens.issue_at(&subject(), issued).unwrap();

        assert!(tokens.validate(&token).is_ok());
    }

    #[test]
    fn foreign_key_signature_is_rejected() {
        let mut other = AppConfig::development().security;
        other.jwt_key = "a-completely-different-signing-key-0123456789".to_string();
        let token = TokenService::new(&other).issue(&subject()).unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut other = AppConfig::development().security;
        other.jwt_issuer = "someone-else".to_string();
        let token = TokenService::new(&other).issue(&subject()).unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::InvalidIssuer));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut other = AppConfig::development().security;
        other.jwt_audience = "another-app".to_string();
        let token = TokenService::new(&other).issue(&subject()).unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::InvalidAudience));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().validate("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }
}
