//! Store ports for the catalog.
//!
//! The services own these traits; backends implement them. Methods that
//! return collections return them in stable id order (ids are time-ordered,
//! so this is creation order) — callers rely on that for deterministic
//! pagination. All string matching is case-insensitive; `*_exists` probes
//! fold case the same way writes do (see [`crate::model::uniq_fold`]).

use async_trait::async_trait;
use chrono::NaiveDate;

use webstore_core::{
    CatalogueCategoryId, CatalogueId, CategoryId, CurrencyId, DomainResult, PageRequest, PriceId,
    ProductId, SellerId,
};

use crate::model::{
    AdminUser, AssociationDetail, Catalogue, CatalogueCategory, CatalogueRef, Category, Currency,
    PriceDetail, Product, ProductPlacement, ProductPrice, Seller, SellerStatus,
};

#[async_trait]
pub trait SellerStore: Send + Sync {
    async fn insert(&self, seller: &Seller) -> DomainResult<()>;
    async fn update(&self, seller: &Seller) -> DomainResult<()>;
    async fn get(&self, id: SellerId) -> DomainResult<Option<Seller>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: SellerId) -> DomainResult<bool>;
    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Seller>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Seller>>;
    async fn email_exists(&self, email: &str) -> DomainResult<bool>;
    /// Keyword match against name OR email.
    async fn search(&self, keyword: &str) -> DomainResult<Vec<Seller>>;
    async fn list_by_status(&self, status: SellerStatus) -> DomainResult<Vec<Seller>>;
    async fn list_joined_after(&self, date: NaiveDate) -> DomainResult<Vec<Seller>>;
    async fn list_joined_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Seller>>;
    async fn count_by_status(&self, status: SellerStatus) -> DomainResult<u64>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, category: &Category) -> DomainResult<()>;
    async fn update(&self, category: &Category) -> DomainResult<()>;
    async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>>;
    async fn delete(&self, id: CategoryId) -> DomainResult<bool>;
    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Category>>;
    /// Categories reachable through at least one product of the seller.
    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Category>>;
    async fn name_exists(&self, name: &str) -> DomainResult<bool>;
    /// Term match against name OR description.
    async fn search(&self, term: &str) -> DomainResult<Vec<Category>>;
    /// Same match, limited to categories the seller has products under.
    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Category>>;
}

#[async_trait]
pub trait CatalogueStore: Send + Sync {
    async fn insert(&self, catalogue: &Catalogue) -> DomainResult<()>;
    async fn update(&self, catalogue: &Catalogue) -> DomainResult<()>;
    async fn get(&self, id: CatalogueId) -> DomainResult<Option<Catalogue>>;
    async fn delete(&self, id: CatalogueId) -> DomainResult<bool>;
    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Catalogue>>;
    /// Catalogues holding at least one product of the seller.
    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Catalogue>>;
    async fn search(&self, name: &str) -> DomainResult<Vec<Catalogue>>;
    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        name: &str,
    ) -> DomainResult<Vec<Catalogue>>;
}

#[async_trait]
pub trait CatalogueCategoryStore: Send + Sync {
    async fn insert(&self, association: &CatalogueCategory) -> DomainResult<()>;
    async fn get(&self, id: CatalogueCategoryId) -> DomainResult<Option<CatalogueCategory>>;
    async fn delete(&self, id: CatalogueCategoryId) -> DomainResult<bool>;
    async fn find_by_pair(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<Option<CatalogueCategory>>;
    async fn pair_exists(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<bool>;
    async fn exists_for_catalogue(&self, catalogue_id: CatalogueId) -> DomainResult<bool>;
    async fn category_ids_for_catalogue(
        &self,
        catalogue_id: CatalogueId,
    ) -> DomainResult<Vec<CategoryId>>;
    /// Distinct catalogue triples associated with the category.
    async fn catalogue_refs_for_category(
        &self,
        category_id: CategoryId,
    ) -> DomainResult<Vec<CatalogueRef>>;
    /// Returns how many rows were removed.
    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64>;
    /// Association joined with both endpoint names; `None` when the row or
    /// either endpoint is gone.
    async fn detail(&self, id: CatalogueCategoryId) -> DomainResult<Option<AssociationDetail>>;
    async fn list_details(
        &self,
        catalogue_id: Option<CatalogueId>,
    ) -> DomainResult<Vec<AssociationDetail>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: &Product) -> DomainResult<()>;
    async fn update(&self, product: &Product) -> DomainResult<()>;
    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>>;
    async fn delete(&self, id: ProductId) -> DomainResult<bool>;
    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Product>>;
    async fn list_by_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Product>>;
    async fn name_exists(&self, name: &str) -> DomainResult<bool>;
    /// Term match against name OR description.
    async fn search(&self, term: &str) -> DomainResult<Vec<Product>>;
    async fn search_by_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Product>>;
    /// Products whose association belongs to the category. Returns how many
    /// rows were removed.
    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64>;
    async fn count_by_category(&self, category_id: CategoryId) -> DomainResult<u64>;
    async fn count_by_category_and_seller(
        &self,
        category_id: CategoryId,
        seller_id: SellerId,
    ) -> DomainResult<u64>;
    /// The seller's products with catalogue and category resolved, one row
    /// per product. Single query shape so detail assembly stays linear.
    async fn placements_for_seller(
        &self,
        seller_id: SellerId,
    ) -> DomainResult<Vec<ProductPlacement>>;
}

#[async_trait]
pub trait ProductPriceStore: Send + Sync {
    async fn insert(&self, price: &ProductPrice) -> DomainResult<()>;
    async fn update(&self, price: &ProductPrice) -> DomainResult<()>;
    async fn get(&self, id: PriceId) -> DomainResult<Option<ProductPrice>>;
    async fn delete(&self, id: PriceId) -> DomainResult<bool>;
    async fn find_by_product_and_currency(
        &self,
        product_id: ProductId,
        currency_id: CurrencyId,
    ) -> DomainResult<Option<ProductPrice>>;
    /// Price lines joined with product and currency for one product.
    async fn details_for_product(&self, product_id: ProductId) -> DomainResult<Vec<PriceDetail>>;
    async fn list_details(&self) -> DomainResult<Vec<PriceDetail>>;
    async fn detail(&self, id: PriceId) -> DomainResult<Option<PriceDetail>>;
    async fn delete_for_product(&self, product_id: ProductId) -> DomainResult<u64>;
    /// Prices of every product placed under the category.
    async fn delete_for_category(&self, category_id: CategoryId) -> DomainResult<u64>;
}

#[async_trait]
pub trait CurrencyStore: Send + Sync {
    async fn insert(&self, currency: &Currency) -> DomainResult<()>;
    async fn get(&self, id: CurrencyId) -> DomainResult<Option<Currency>>;
    async fn list(&self) -> DomainResult<Vec<Currency>>;
    async fn is_empty(&self) -> DomainResult<bool>;
}

#[async_trait]
pub trait AdminUserStore: Send + Sync {
    async fn insert(&self, user: &AdminUser) -> DomainResult<()>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<AdminUser>>;
}
