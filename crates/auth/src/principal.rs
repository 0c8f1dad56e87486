//! Authenticated principal and the per-request caller value.
//!
//! There is no ambient security context anywhere in this codebase: the
//! identity of the caller travels as an explicit [`Caller`] into every
//! service call.

use serde::{Deserialize, Serialize};

use webstore_core::{DomainResult, FALLBACK_ACTOR, SellerId, UserId};

use crate::{AccessScope, Role};

/// A verified identity, decoded from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Subject email (also the audit name).
    pub email: String,
    pub role: Role,
    /// Present for seller principals; drives owner scoping.
    pub seller_id: Option<SellerId>,
    /// Present for back-office admin principals.
    pub user_id: Option<UserId>,
}

impl Principal {
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The caller of a service operation: an authenticated principal or an
/// anonymous visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    principal: Option<Principal>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_seller(&self) -> bool {
        self.principal.as_ref().is_some_and(Principal::is_seller)
    }

    /// Resolve the data-access scope for this caller.
    ///
    /// Fails with `Unauthorized` before any data is touched when a seller
    /// principal carries no seller id.
    pub fn scope(&self) -> DomainResult<AccessScope> {
        AccessScope::resolve(self.principal.as_ref())
    }

    /// Name recorded in audit fields: the principal's email, or the
    /// fallback actor for anonymous calls.
    pub fn audit_name(&self) -> &str {
        self.principal
            .as_ref()
            .map_or(FALLBACK_ACTOR, |p| p.email.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_audits_as_admin() {
        assert_eq!(Caller::anonymous().audit_name(), "admin");
    }

    #[test]
    fn authenticated_audits_as_email() {
        let caller = Caller::authenticated(Principal {
            email: "jo@example.com".into(),
            role: Role::Seller,
            seller_id: Some(SellerId::new()),
            user_id: None,
        });
        assert_eq!(caller.audit_name(), "jo@example.com");
        assert!(caller.is_seller());
    }
}
