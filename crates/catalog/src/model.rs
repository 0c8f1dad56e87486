//! Catalog records as stored, plus the row-shaped read structs the stores
//! return for join-style queries.

use core::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use webstore_core::{
    AuditStamp, CatalogueCategoryId, CatalogueId, CategoryId, CurrencyId, DomainError, PriceId,
    ProductId, SellerId, UserId,
};

/// Case folding applied to every uniqueness check (seller email, category
/// name, product name). Searches already fold case; this keeps writes and
/// reads consistent.
pub fn uniq_fold(value: &str) -> String {
    value.to_lowercase()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellerStatus {
    Active,
    Inactive,
}

impl SellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::Active => "ACTIVE",
            SellerStatus::Inactive => "INACTIVE",
        }
    }
}

impl Default for SellerStatus {
    fn default() -> Self {
        SellerStatus::Active
    }
}

impl core::fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SellerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(SellerStatus::Active),
            "INACTIVE" => Ok(SellerStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "unknown seller status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub email: String,
    pub status: SellerStatus,
    pub joining_date: NaiveDate,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub id: CatalogueId,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

/// Association row binding one catalogue to one category. Products attach
/// here, not directly to either side; at most one row exists per
/// (catalogue, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueCategory {
    pub id: CatalogueCategoryId,
    pub catalogue_id: CatalogueId,
    pub category_id: CategoryId,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub catalogue_category_id: CatalogueCategoryId,
    pub seller_id: SellerId,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

/// Price amounts are whole minor units (cents); the wire key is `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrice {
    pub id: PriceId,
    pub product_id: ProductId,
    pub currency_id: CurrencyId,
    #[serde(rename = "amount")]
    pub amount_minor: i64,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

/// Reference data. Seeded, never mutated by the catalog services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub code: String,
    pub symbol: String,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

/// Back-office identity backing the admin login path. The role is stored
/// data, not the closed caller role; login accepts it when it reads
/// "ADMIN" case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    pub username: String,
    pub full_name: Option<String>,
    pub email: String,
    pub role: String,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

impl AdminUser {
    /// Display name used in login responses.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

// Row-shaped query results.

/// One product of a seller with its placement resolved; input to the
/// seller-details grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPlacement {
    pub product_id: ProductId,
    pub catalogue_id: CatalogueId,
    pub catalogue_name: String,
    pub catalogue_description: Option<String>,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_description: Option<String>,
}

/// Price line joined with its product and currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetail {
    pub price_id: PriceId,
    pub product_id: ProductId,
    pub product_name: String,
    pub currency_id: CurrencyId,
    pub currency_code: String,
    pub currency_symbol: String,
    #[serde(rename = "amount")]
    pub amount_minor: i64,
}

/// Distinct catalogue triple associated with a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueRef {
    pub catalogue_id: CatalogueId,
    pub name: String,
    pub description: Option<String>,
}

/// Association row joined with both endpoint names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationDetail {
    pub id: CatalogueCategoryId,
    pub catalogue_id: CatalogueId,
    pub catalogue_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("active".parse::<SellerStatus>().unwrap(), SellerStatus::Active);
        assert_eq!(" INACTIVE ".parse::<SellerStatus>().unwrap(), SellerStatus::Inactive);
        assert!("retired".parse::<SellerStatus>().is_err());
    }

    #[test]
    fn admin_user_display_name_prefers_full_name() {
        let mut user = AdminUser {
            id: UserId::new(),
            username: "ops".into(),
            full_name: Some("Operations Admin".into()),
            email: "ops@example.com".into(),
            role: "ADMIN".into(),
            audit: AuditStamp::new("admin"),
        };
        assert_eq!(user.display_name(), "Operations Admin");
        user.full_name = None;
        assert_eq!(user.display_name(), "ops");
    }

    #[test]
    fn uniqueness_folding_is_lowercase() {
        assert_eq!(uniq_fold("Electronics"), uniq_fold("ELECTRONICS"));
    }
}
