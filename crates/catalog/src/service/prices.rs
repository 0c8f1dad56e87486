//! Price lines and the currency reference data they point at.
//!
//! Amounts are carried in minor units of the currency (cents, paise), so a
//! line of 1999 in USD is $19.99. One product carries at most one line per
//! currency.

use std::sync::Arc;

use webstore_auth::Caller;
use webstore_core::{AuditStamp, CurrencyId, DomainError, DomainResult, PriceId, ProductId};

use crate::model::{Currency, PriceDetail, ProductPrice};
use crate::store::{CurrencyStore, ProductPriceStore, ProductStore};

/// Fields accepted when creating a price line.
#[derive(Debug, Clone)]
pub struct PriceDraft {
    pub product_id: ProductId,
    pub currency_id: CurrencyId,
    pub amount_minor: i64,
}

#[derive(Clone)]
pub struct PriceService {
    prices: Arc<dyn ProductPriceStore>,
    products: Arc<dyn ProductStore>,
    currencies: Arc<dyn CurrencyStore>,
}

impl PriceService {
    pub fn new(
        prices: Arc<dyn ProductPriceStore>,
        products: Arc<dyn ProductStore>,
        currencies: Arc<dyn CurrencyStore>,
    ) -> Self {
        Self {
            prices,
            products,
            currencies,
        }
    }

    pub async fn create(&self, caller: &Caller, draft: PriceDraft) -> DomainResult<PriceDetail> {
        validate_amount(draft.amount_minor)?;
        let product = self
            .products
            .get(draft.product_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Product not found with ID: {}", draft.product_id))
            })?;
        let currency = self
            .currencies
            .get(draft.currency_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Currency not found with ID: {}", draft.currency_id))
            })?;
        if self
            .prices
            .find_by_product_and_currency(draft.product_id, draft.currency_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "Price already exists for this product and currency",
            ));
        }
        let price = ProductPrice {
            id: PriceId::new(),
            product_id: product.id,
            currency_id: currency.id,
            amount_minor: draft.amount_minor,
            audit: AuditStamp::new(caller.audit_name()),
        };
        self.prices.insert(&price).await?;
        tracing::info!(price_id = %price.id, product_id = %product.id, "price line created");
        Ok(PriceDetail {
            price_id: price.id,
            product_id: product.id,
            product_name: product.name,
            currency_id: currency.id,
            currency_code: currency.code,
            currency_symbol: currency.symbol,
            amount_minor: price.amount_minor,
        })
    }

    pub async fn get(&self, id: PriceId) -> DomainResult<PriceDetail> {
        self.prices.detail(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self) -> DomainResult<Vec<PriceDetail>> {
        self.prices.list_details().await
    }

    pub async fn list_for_product(&self, product_id: ProductId) -> DomainResult<Vec<PriceDetail>> {
        self.prices.details_for_product(product_id).await
    }

    /// Changes only the amount; the product and currency of a line are fixed.
    pub async fn update_amount(
        &self,
        caller: &Caller,
        id: PriceId,
        amount_minor: i64,
    ) -> DomainResult<PriceDetail> {
        validate_amount(amount_minor)?;
        let mut price = self
            .prices
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        price.amount_minor = amount_minor;
        price.audit.touch(caller.audit_name());
        self.prices.update(&price).await?;
        self.prices.detail(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: PriceId) -> DomainResult<()> {
        if !self.prices.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: PriceId) -> DomainError {
    DomainError::not_found(format!("Product price not found with ID: {id}"))
}

fn validate_amount(amount_minor: i64) -> DomainResult<()> {
    if amount_minor < 0 {
        return Err(DomainError::validation(
            "Price amount must not be negative",
        ));
    }
    Ok(())
}

/// Currencies a price line may reference. The set is read-only through the
/// API and seeded at startup when empty.
#[derive(Clone)]
pub struct CurrencyService {
    currencies: Arc<dyn CurrencyStore>,
}

impl CurrencyService {
    pub fn new(currencies: Arc<dyn CurrencyStore>) -> Self {
        Self { currencies }
    }

    pub async fn list(&self) -> DomainResult<Vec<Currency>> {
        self.currencies.list().await
    }

    /// Seeds the common set when the table is empty. Returns how many rows
    /// were written.
    pub async fn seed_defaults(&self) -> DomainResult<usize> {
        if !self.currencies.is_empty().await? {
            return Ok(0);
        }
        let defaults = [("USD", "$"), ("EUR", "\u{20ac}"), ("GBP", "\u{a3}"), ("INR", "\u{20b9}")];
        for (code, symbol) in defaults {
            let currency = Currency {
                id: CurrencyId::new(),
                code: code.to_string(),
                symbol: symbol.to_string(),
                audit: AuditStamp::new(webstore_core::FALLBACK_ACTOR),
            };
            self.currencies.insert(&currency).await?;
        }
        tracing::info!(count = defaults.len(), "seeded default currencies");
        Ok(defaults.len())
    }
}
