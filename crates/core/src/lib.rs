//! `webstore-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod audit;
pub mod error;
pub mod id;
pub mod page;

pub use audit::{AuditStamp, FALLBACK_ACTOR};
pub use error::{DomainError, DomainResult};
pub use id::{
    CatalogueCategoryId, CatalogueId, CategoryId, CurrencyId, PriceId, ProductId, SellerId, UserId,
};
pub use page::PageRequest;
