//! Login: a verified Google identity is exchanged for a locally issued
//! session token.
//!
//! The Google token proves who the caller is; the seller and admin tables
//! decide whether that identity may log in at all. Nobody is auto-registered
//! here. Lookup failures surface as not-found and an inactive seller or a
//! non-admin user as forbidden, so a failed login tells the caller which
//! precondition was missing.

use std::sync::Arc;

use serde::Serialize;

use webstore_auth::{GoogleTokenVerifier, Principal, Role, TokenService};
use webstore_core::{DomainError, DomainResult, SellerId, UserId};

use crate::model::SellerStatus;
use crate::store::{AdminUserStore, SellerStore};

/// The login payload: a Google ID token plus the side of the system the
/// caller wants to enter. A blank side means seller.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub google_token: String,
    pub user_type: Option<String>,
}

/// What a successful login returns to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub jwt_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<SellerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct LoginService {
    verifier: Arc<dyn GoogleTokenVerifier>,
    tokens: TokenService,
    sellers: Arc<dyn SellerStore>,
    users: Arc<dyn AdminUserStore>,
}

impl LoginService {
    pub fn new(
        verifier: Arc<dyn GoogleTokenVerifier>,
        tokens: TokenService,
        sellers: Arc<dyn SellerStore>,
        users: Arc<dyn AdminUserStore>,
    ) -> Self {
        Self {
            verifier,
            tokens,
            sellers,
            users,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> DomainResult<AuthOutcome> {
        let identity = self
            .verifier
            .verify(&request.google_token)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "google token rejected");
                DomainError::unauthorized(format!("Authentication failed: {err}"))
            })?;
        match Role::normalize(request.user_type.as_deref())? {
            Role::Admin => self.login_admin(&identity.email).await,
            Role::Seller => self.login_seller(&identity.email).await,
        }
    }

    async fn login_seller(&self, email: &str) -> DomainResult<AuthOutcome> {
        let seller = self.sellers.find_by_email(email).await?.ok_or_else(|| {
            DomainError::not_found(format!("Seller not found with email: {email}"))
        })?;
        if seller.status != SellerStatus::Active {
            return Err(DomainError::forbidden("Seller account is not active"));
        }
        let principal = Principal {
            email: seller.email.clone(),
            role: Role::Seller,
            seller_id: Some(seller.id),
            user_id: None,
        };
        let token = self.issue(&principal)?;
        tracing::info!(seller_id = %seller.id, "seller session issued");
        Ok(AuthOutcome {
            jwt_token: token,
            seller_id: Some(seller.id),
            user_id: None,
            email: seller.email,
            name: seller.name,
            role: Role::Seller,
        })
    }

    async fn login_admin(&self, email: &str) -> DomainResult<AuthOutcome> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            DomainError::not_found(format!("Admin user not found with email: {email}"))
        })?;
        if !user.role.eq_ignore_ascii_case(Role::Admin.as_str()) {
            return Err(DomainError::forbidden(format!(
                "User with email {} is not an admin",
                user.email
            )));
        }
        let principal = Principal {
            email: user.email.clone(),
            role: Role::Admin,
            seller_id: None,
            user_id: Some(user.id),
        };
        let token = self.issue(&principal)?;
        tracing::info!(user_id = %user.id, "admin session issued");
        let name = user.display_name().to_string();
        Ok(AuthOutcome {
            jwt_token: token,
            seller_id: None,
            user_id: Some(user.id),
            email: user.email,
            name,
            role: Role::Admin,
        })
    }

    fn issue(&self, principal: &Principal) -> DomainResult<String> {
        self.tokens
            .issue(principal)
            .map_err(|err| DomainError::unauthorized(format!("Authentication failed: {err}")))
    }
}
