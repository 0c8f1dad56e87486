//! Access scope evaluation.
//!
//! The single place where a role becomes a data-access policy. Every
//! list/search/aggregate operation takes the resolved scope; no other
//! component inspects roles to decide visibility.

use serde::{Deserialize, Serialize};

use webstore_core::{DomainError, DomainResult, SellerId};

use crate::{Principal, Role};

/// What slice of the catalog a caller may see and touch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessScope {
    /// Full visibility. Admins, and anonymous callers under the public
    /// read policy below.
    Unrestricted,
    /// Restricted to records owned by one seller.
    OwnedBy(SellerId),
}

impl AccessScope {
    /// Resolve the scope for an optional principal.
    ///
    /// Policy, stated explicitly rather than left implicit:
    /// - `Admin` sees everything.
    /// - Anonymous callers also resolve to [`AccessScope::Unrestricted`];
    ///   the catalog is publicly readable and deployments that want to
    ///   change that tighten it here, in one place.
    /// - `Seller` resolves to [`AccessScope::OwnedBy`] their seller id. A
    ///   seller token without a seller id is rejected before any data
    ///   access happens.
    pub fn resolve(principal: Option<&Principal>) -> DomainResult<Self> {
        match principal {
            None => Ok(AccessScope::Unrestricted),
            Some(p) => match p.role {
                Role::Admin => Ok(AccessScope::Unrestricted),
                Role::Seller => p
                    .seller_id
                    .map(AccessScope::OwnedBy)
                    .ok_or_else(|| DomainError::unauthorized("Seller ID not found in token")),
            },
        }
    }

    /// The owning seller when restricted, `None` when unrestricted.
    pub fn owner(&self) -> Option<SellerId> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::OwnedBy(id) => Some(*id),
        }
    }

    /// Whether a record owned by `seller` is visible under this scope.
    pub fn permits(&self, seller: SellerId) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::OwnedBy(own) => *own == seller,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webstore_core::UserId;

    fn seller_principal(seller_id: Option<SellerId>) -> Principal {
        Principal {
            email: "s@example.com".into(),
            role: Role::Seller,
            seller_id,
            user_id: None,
        }
    }

    #[test]
    fn admin_is_unrestricted() {
        let p = Principal {
            email: "a@example.com".into(),
            role: Role::Admin,
            seller_id: None,
            user_id: Some(UserId::new()),
        };
        assert_eq!(
            AccessScope::resolve(Some(&p)).unwrap(),
            AccessScope::Unrestricted
        );
    }

    #[test]
    fn anonymous_is_unrestricted() {
        assert_eq!(
            AccessScope::resolve(None).unwrap(),
            AccessScope::Unrestricted
        );
    }

    #[test]
    fn seller_is_scoped_to_own_records() {
        let id = SellerId::new();
        let scope = AccessScope::resolve(Some(&seller_principal(Some(id)))).unwrap();
        assert_eq!(scope, AccessScope::OwnedBy(id));
        assert!(scope.permits(id));
        assert!(!scope.permits(SellerId::new()));
    }

    #[test]
    fn seller_without_id_is_rejected_before_data_access() {
        let err = AccessScope::resolve(Some(&seller_principal(None))).unwrap_err();
        assert_eq!(
            err,
            DomainError::unauthorized("Seller ID not found in token")
        );
    }
}
