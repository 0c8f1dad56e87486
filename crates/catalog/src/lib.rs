//! Catalog domain: sellers, the catalogue/category taxonomy, products, and
//! their price lines.
//!
//! This crate holds the records, the store ports the backends implement, and
//! the services that enforce the business rules over those ports. It does no
//! HTTP and owns no storage.

pub mod model;
pub mod service;
pub mod store;
pub mod views;

pub use model::{
    AdminUser, AssociationDetail, Catalogue, CatalogueCategory, CatalogueRef, Category, Currency,
    PriceDetail, Product, ProductPlacement, ProductPrice, Seller, SellerStatus, uniq_fold,
};
pub use service::{
    AssociationDraft, AssociationService, AuthOutcome, CatalogueDraft, CatalogueService,
    CategoryDraft, CategoryService, CurrencyService, LoginRequest, LoginService, PriceDraft,
    PriceService, ProductDraft, ProductService, SellerDraft, SellerService,
};
pub use store::{
    AdminUserStore, CatalogueCategoryStore, CatalogueStore, CategoryStore, CurrencyStore,
    ProductPriceStore, ProductStore, SellerStore,
};
pub use views::{
    CatalogueDetails, CategoryDetails, CategoryView, ProductView, SellerDetails,
    group_seller_products,
};
