//! Locally issued session tokens.
//!
//! Login exchanges a verified Google identity for an HS256 token minted
//! here; every subsequent request presents it as a bearer credential.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use webstore_core::{SellerId, UserId};

use crate::{Principal, Role};

/// Claims carried by a session token.
///
/// `sub` is the account email. Exactly one of `seller_id`/`user_id` is set
/// for tokens minted by this service; decoding tolerates both being absent
/// so that scope resolution can reject such tokens with a precise error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<SellerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("session token expired")]
    Expired,

    #[error("invalid session token")]
    Invalid,
}

/// Issues and verifies session tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Mint a token for a resolved principal.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: principal.email.clone(),
            role: principal.role,
            seller_id: principal.seller_id,
            user_id: principal.user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// Verify a presented token and rebuild the principal it names.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;
        let claims = data.claims;
        Ok(Principal {
            email: claims.sub,
            role: claims.role,
            seller_id: claims.seller_id,
            user_id: claims.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::hours(1))
    }

    fn seller() -> Principal {
        Principal {
            email: "s@example.com".into(),
            role: Role::Seller,
            seller_id: Some(SellerId::new()),
            user_id: None,
        }
    }

    #[test]
    fn issue_then_verify_round_trips_the_principal() {
        let svc = service();
        let principal = seller();
        let token = svc.issue(&principal).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), principal);
    }

    #[test]
    fn verify_rejects_garbage() {
        assert_eq!(
            service().verify("not.a.token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let token = service().issue(&seller()).unwrap();
        let other = TokenService::new("different-secret", Duration::hours(1));
        assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn verify_rejects_expired_tokens() {
        let svc = TokenService::new("test-secret", Duration::seconds(-120));
        let token = svc.issue(&seller()).unwrap();
        assert_eq!(svc.verify(&token).unwrap_err(), TokenError::Expired);
    }
}
