//! Closed role set.
//!
//! Roles are a closed enum on purpose: the only component allowed to turn a
//! role into a data-access policy is the scope evaluator. Everything else
//! treats `Role` as an opaque label.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use webstore_core::DomainError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
        }
    }

    /// Parse a caller-supplied role label. Blank input falls back to
    /// [`Role::Seller`], matching the login contract.
    pub fn normalize(value: Option<&str>) -> Result<Self, DomainError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Role::Seller),
            Some(raw) => raw.parse(),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SELLER" => Ok(Role::Seller),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Seller ".parse::<Role>().unwrap(), Role::Seller);
    }

    #[test]
    fn blank_normalizes_to_seller() {
        assert_eq!(Role::normalize(None).unwrap(), Role::Seller);
        assert_eq!(Role::normalize(Some("  ")).unwrap(), Role::Seller);
        assert_eq!(Role::normalize(Some("ADMIN")).unwrap(), Role::Admin);
    }

    #[test]
    fn rejects_unknown_labels() {
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(DomainError::Validation(_))
        ));
    }
}
