//! Seller registry operations and the per-seller drill-down.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use webstore_auth::Caller;
use webstore_core::{DomainError, DomainResult, PageRequest, SellerId};

use crate::model::{Seller, SellerStatus, uniq_fold};
use crate::store::{ProductStore, SellerStore};
use crate::views::{SellerDetails, group_seller_products};

/// Fields accepted when creating or updating a seller.
#[derive(Debug, Clone)]
pub struct SellerDraft {
    pub name: String,
    pub email: String,
    /// Defaults to [`SellerStatus::Active`] on create; left unchanged on
    /// update when absent.
    pub status: Option<SellerStatus>,
    pub joining_date: NaiveDate,
}

#[derive(Clone)]
pub struct SellerService {
    sellers: Arc<dyn SellerStore>,
    products: Arc<dyn ProductStore>,
}

impl SellerService {
    pub fn new(sellers: Arc<dyn SellerStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { sellers, products }
    }

    pub async fn create(&self, caller: &Caller, draft: SellerDraft) -> DomainResult<Seller> {
        validate(&draft)?;
        if self.sellers.email_exists(&draft.email).await? {
            return Err(DomainError::conflict(format!(
                "Email already exists: {}",
                draft.email
            )));
        }
        let seller = Seller {
            id: SellerId::new(),
            name: draft.name,
            email: draft.email,
            status: draft.status.unwrap_or_default(),
            joining_date: draft.joining_date,
            audit: webstore_core::AuditStamp::new(caller.audit_name()),
        };
        self.sellers.insert(&seller).await?;
        tracing::info!(seller_id = %seller.id, "seller registered");
        Ok(seller)
    }

    pub async fn get(&self, id: SellerId) -> DomainResult<Seller> {
        self.require(id).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: SellerId,
        draft: SellerDraft,
    ) -> DomainResult<Seller> {
        validate(&draft)?;
        let mut seller = self.require(id).await?;
        if uniq_fold(&draft.email) != uniq_fold(&seller.email)
            && self.sellers.email_exists(&draft.email).await?
        {
            return Err(DomainError::conflict(format!(
                "Email already exists: {}",
                draft.email
            )));
        }
        seller.name = draft.name;
        seller.email = draft.email;
        if let Some(status) = draft.status {
            seller.status = status;
        }
        seller.joining_date = draft.joining_date;
        seller.audit.touch(caller.audit_name());
        self.sellers.update(&seller).await?;
        Ok(seller)
    }

    /// Removes the seller record only. Products the seller owned stay behind
    /// and are reported with a dangling owner until cleaned up separately.
    pub async fn delete(&self, id: SellerId) -> DomainResult<()> {
        if !self.sellers.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(seller_id = %id, "seller deleted");
        Ok(())
    }

    pub async fn list(&self, page: PageRequest) -> DomainResult<Vec<Seller>> {
        self.sellers.list(page).await
    }

    pub async fn search(&self, keyword: &str) -> DomainResult<Vec<Seller>> {
        self.sellers.search(keyword).await
    }

    pub async fn by_status(&self, status: SellerStatus) -> DomainResult<Vec<Seller>> {
        self.sellers.list_by_status(status).await
    }

    pub async fn joined_after(&self, date: NaiveDate) -> DomainResult<Vec<Seller>> {
        self.sellers.list_joined_after(date).await
    }

    pub async fn joined_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Seller>> {
        self.sellers.list_joined_between(start, end).await
    }

    pub async fn count_by_status(&self, status: SellerStatus) -> DomainResult<u64> {
        self.sellers.count_by_status(status).await
    }

    /// Seller header plus the catalogue and category drill-down, built from
    /// the seller's own products only. Catalogues and categories the seller
    /// has no products in do not appear.
    pub async fn details(&self, id: SellerId) -> DomainResult<SellerDetails> {
        let seller = self.require(id).await?;
        let placements = self.products.placements_for_seller(id).await?;
        Ok(SellerDetails {
            seller_id: seller.id,
            name: seller.name,
            email: seller.email,
            catalogues: group_seller_products(&placements),
        })
    }

    async fn require(&self, id: SellerId) -> DomainResult<Seller> {
        self.sellers.get(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: SellerId) -> DomainError {
    DomainError::not_found(format!("Seller not found with ID: {id}"))
}

fn validate(draft: &SellerDraft) -> DomainResult<()> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Seller name should not be blank"));
    }
    let name_len = name.chars().count();
    if !(2..=100).contains(&name_len) {
        return Err(DomainError::validation(
            "Seller name must be between 2 and 100 characters",
        ));
    }
    let email = draft.email.trim();
    if email.is_empty() {
        return Err(DomainError::validation(
            "Seller mail id should not be blank",
        ));
    }
    if !email_shape_ok(email) {
        return Err(DomainError::validation("Email should be valid"));
    }
    if email.chars().count() > 100 {
        return Err(DomainError::validation(
            "Email must not exceed 100 characters",
        ));
    }
    if draft.joining_date > Utc::now().date_naive() {
        return Err(DomainError::validation(
            "Joining date cannot be in the future",
        ));
    }
    Ok(())
}

fn email_shape_ok(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.starts_with('.') && domain.contains('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str) -> SellerDraft {
        SellerDraft {
            name: name.to_string(),
            email: email.to_string(),
            status: None,
            joining_date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn rejects_blank_and_short_names() {
        assert!(validate(&draft("  ", "a@b.com")).is_err());
        assert!(validate(&draft("x", "a@b.com")).is_err());
        assert!(validate(&draft("ok", "a@b.com")).is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate(&draft("Jane", "not-an-email")).is_err());
        assert!(validate(&draft("Jane", "@no-local.com")).is_err());
        assert!(validate(&draft("Jane", "jane@shop.example")).is_ok());
    }

    #[test]
    fn rejects_future_joining_date() {
        let mut d = draft("Jane", "jane@shop.example");
        d.joining_date = Utc::now().date_naive() + chrono::Duration::days(2);
        assert!(validate(&d).is_err());
    }
}
