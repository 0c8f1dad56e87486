//! In-memory backend implementing every store port.
//!
//! One mutex over the whole state keeps cross-table reads coherent, the same
//! way a single connection would. Collections come back sorted by id, which
//! is creation order for time-ordered ids. Useful as the default backend
//! when no database is configured, and as the fixture for service tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use webstore_catalog::model::{
    AdminUser, AssociationDetail, Catalogue, CatalogueCategory, CatalogueRef, Category, Currency,
    PriceDetail, Product, ProductPlacement, ProductPrice, Seller, SellerStatus, uniq_fold,
};
use webstore_catalog::store::{
    AdminUserStore, CatalogueCategoryStore, CatalogueStore, CategoryStore, CurrencyStore,
    ProductPriceStore, ProductStore, SellerStore,
};
use webstore_core::{
    CatalogueCategoryId, CatalogueId, CategoryId, CurrencyId, DomainError, DomainResult,
    PageRequest, PriceId, ProductId, SellerId, UserId,
};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    sellers: HashMap<SellerId, Seller>,
    categories: HashMap<CategoryId, Category>,
    catalogues: HashMap<CatalogueId, Catalogue>,
    associations: HashMap<CatalogueCategoryId, CatalogueCategory>,
    products: HashMap<ProductId, Product>,
    prices: HashMap<PriceId, ProductPrice>,
    currencies: HashMap<CurrencyId, Currency>,
    users: HashMap<UserId, AdminUser>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.inner
            .lock()
            .map_err(|_| DomainError::storage("store mutex poisoned"))
    }
}

fn contains_fold(haystack: &str, needle: &str) -> bool {
    uniq_fold(haystack).contains(&uniq_fold(needle))
}

fn eq_fold(a: &str, b: &str) -> bool {
    uniq_fold(a) == uniq_fold(b)
}

impl State {
    /// Category the product is placed under, resolved through its
    /// association row. `None` when the association is gone.
    fn category_of(&self, product: &Product) -> Option<CategoryId> {
        self.associations
            .get(&product.catalogue_category_id)
            .map(|assoc| assoc.category_id)
    }

    fn placement_of(&self, product: &Product) -> Option<ProductPlacement> {
        let assoc = self.associations.get(&product.catalogue_category_id)?;
        let catalogue = self.catalogues.get(&assoc.catalogue_id)?;
        let category = self.categories.get(&assoc.category_id)?;
        Some(ProductPlacement {
            product_id: product.id,
            catalogue_id: catalogue.id,
            catalogue_name: catalogue.name.clone(),
            catalogue_description: catalogue.description.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
            category_description: category.description.clone(),
        })
    }

    fn price_detail_of(&self, price: &ProductPrice) -> Option<PriceDetail> {
        let product = self.products.get(&price.product_id)?;
        let currency = self.currencies.get(&price.currency_id)?;
        Some(PriceDetail {
            price_id: price.id,
            product_id: product.id,
            product_name: product.name.clone(),
            currency_id: currency.id,
            currency_code: currency.code.clone(),
            currency_symbol: currency.symbol.clone(),
            amount_minor: price.amount_minor,
        })
    }

    fn association_detail_of(&self, assoc: &CatalogueCategory) -> Option<AssociationDetail> {
        let catalogue = self.catalogues.get(&assoc.catalogue_id)?;
        let category = self.categories.get(&assoc.category_id)?;
        Some(AssociationDetail {
            id: assoc.id,
            catalogue_id: catalogue.id,
            catalogue_name: catalogue.name.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
            audit: assoc.audit.clone(),
        })
    }

    fn sorted_sellers(&self) -> Vec<Seller> {
        let mut sellers: Vec<Seller> = self.sellers.values().cloned().collect();
        sellers.sort_by_key(|s| s.id);
        sellers
    }

    fn sorted_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        products
    }

    fn sorted_associations(&self) -> Vec<CatalogueCategory> {
        let mut rows: Vec<CatalogueCategory> = self.associations.values().cloned().collect();
        rows.sort_by_key(|a| a.id);
        rows
    }
}

#[async_trait]
impl SellerStore for MemoryStore {
    async fn insert(&self, seller: &Seller) -> DomainResult<()> {
        self.state()?.sellers.insert(seller.id, seller.clone());
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> DomainResult<()> {
        self.state()?.sellers.insert(seller.id, seller.clone());
        Ok(())
    }

    async fn get(&self, id: SellerId) -> DomainResult<Option<Seller>> {
        Ok(self.state()?.sellers.get(&id).cloned())
    }

    async fn delete(&self, id: SellerId) -> DomainResult<bool> {
        Ok(self.state()?.sellers.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Seller>> {
        Ok(page.window(self.state()?.sorted_sellers()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Seller>> {
        Ok(self
            .state()?
            .sellers
            .values()
            .find(|s| eq_fold(&s.email, email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        Ok(self
            .state()?
            .sellers
            .values()
            .any(|s| eq_fold(&s.email, email)))
    }

    async fn search(&self, keyword: &str) -> DomainResult<Vec<Seller>> {
        let state = self.state()?;
        let mut hits: Vec<Seller> = state
            .sellers
            .values()
            .filter(|s| contains_fold(&s.name, keyword) || contains_fold(&s.email, keyword))
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.id);
        Ok(hits)
    }

    async fn list_by_status(&self, status: SellerStatus) -> DomainResult<Vec<Seller>> {
        let state = self.state()?;
        let mut hits: Vec<Seller> = state
            .sellers
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.id);
        Ok(hits)
    }

    async fn list_joined_after(&self, date: NaiveDate) -> DomainResult<Vec<Seller>> {
        let state = self.state()?;
        let mut hits: Vec<Seller> = state
            .sellers
            .values()
            .filter(|s| s.joining_date > date)
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.id);
        Ok(hits)
    }

    async fn list_joined_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Seller>> {
        let state = self.state()?;
        let mut hits: Vec<Seller> = state
            .sellers
            .values()
            .filter(|s| s.joining_date >= start && s.joining_date <= end)
            .cloned()
            .collect();
        hits.sort_by_key(|s| s.id);
        Ok(hits)
    }

    async fn count_by_status(&self, status: SellerStatus) -> DomainResult<u64> {
        Ok(self
            .state()?
            .sellers
            .values()
            .filter(|s| s.status == status)
            .count() as u64)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn insert(&self, category: &Category) -> DomainResult<()> {
        self.state()?
            .categories
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> DomainResult<()> {
        self.state()?
            .categories
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        Ok(self.state()?.categories.get(&id).cloned())
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<bool> {
        Ok(self.state()?.categories.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Category>> {
        let state = self.state()?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| c.id);
        Ok(page.window(categories))
    }

    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Category>> {
        let state = self.state()?;
        let mut ids: Vec<CategoryId> = state
            .products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .filter_map(|p| state.category_of(p))
            .collect();
        ids.sort();
        ids.dedup();
        let categories: Vec<Category> = ids
            .into_iter()
            .filter_map(|id| state.categories.get(&id).cloned())
            .collect();
        Ok(page.window(categories))
    }

    async fn name_exists(&self, name: &str) -> DomainResult<bool> {
        Ok(self
            .state()?
            .categories
            .values()
            .any(|c| eq_fold(&c.name, name)))
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Category>> {
        let state = self.state()?;
        let mut hits: Vec<Category> = state
            .categories
            .values()
            .filter(|c| category_matches(c, term))
            .cloned()
            .collect();
        hits.sort_by_key(|c| c.id);
        Ok(hits)
    }

    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Category>> {
        let all = CategoryStore::list_for_seller(self, seller_id, PageRequest::all()).await?;
        Ok(all
            .into_iter()
            .filter(|c| category_matches(c, term))
            .collect())
    }
}

#[async_trait]
impl CatalogueStore for MemoryStore {
    async fn insert(&self, catalogue: &Catalogue) -> DomainResult<()> {
        self.state()?
            .catalogues
            .insert(catalogue.id, catalogue.clone());
        Ok(())
    }

    async fn update(&self, catalogue: &Catalogue) -> DomainResult<()> {
        self.state()?
            .catalogues
            .insert(catalogue.id, catalogue.clone());
        Ok(())
    }

    async fn get(&self, id: CatalogueId) -> DomainResult<Option<Catalogue>> {
        Ok(self.state()?.catalogues.get(&id).cloned())
    }

    async fn delete(&self, id: CatalogueId) -> DomainResult<bool> {
        Ok(self.state()?.catalogues.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Catalogue>> {
        let state = self.state()?;
        let mut catalogues: Vec<Catalogue> = state.catalogues.values().cloned().collect();
        catalogues.sort_by_key(|c| c.id);
        Ok(page.window(catalogues))
    }

    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Catalogue>> {
        let state = self.state()?;
        let mut ids: Vec<CatalogueId> = state
            .products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .filter_map(|p| {
                state
                    .associations
                    .get(&p.catalogue_category_id)
                    .map(|a| a.catalogue_id)
            })
            .collect();
        ids.sort();
        ids.dedup();
        let catalogues: Vec<Catalogue> = ids
            .into_iter()
            .filter_map(|id| state.catalogues.get(&id).cloned())
            .collect();
        Ok(page.window(catalogues))
    }

    async fn search(&self, name: &str) -> DomainResult<Vec<Catalogue>> {
        let state = self.state()?;
        let mut hits: Vec<Catalogue> = state
            .catalogues
            .values()
            .filter(|c| contains_fold(&c.name, name))
            .cloned()
            .collect();
        hits.sort_by_key(|c| c.id);
        Ok(hits)
    }

    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        name: &str,
    ) -> DomainResult<Vec<Catalogue>> {
        let all = CatalogueStore::list_for_seller(self, seller_id, PageRequest::all()).await?;
        Ok(all
            .into_iter()
            .filter(|c| contains_fold(&c.name, name))
            .collect())
    }
}

#[async_trait]
impl CatalogueCategoryStore for MemoryStore {
    async fn insert(&self, association: &CatalogueCategory) -> DomainResult<()> {
        self.state()?
            .associations
            .insert(association.id, association.clone());
        Ok(())
    }

    async fn get(&self, id: CatalogueCategoryId) -> DomainResult<Option<CatalogueCategory>> {
        Ok(self.state()?.associations.get(&id).cloned())
    }

    async fn delete(&self, id: CatalogueCategoryId) -> DomainResult<bool> {
        Ok(self.state()?.associations.remove(&id).is_some())
    }

    async fn find_by_pair(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<Option<CatalogueCategory>> {
        Ok(self
            .state()?
            .associations
            .values()
            .find(|a| a.catalogue_id == catalogue_id && a.category_id == category_id)
            .cloned())
    }

    async fn pair_exists(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<bool> {
        Ok(self
            .find_by_pair(catalogue_id, category_id)
            .await?
            .is_some())
    }

    async fn exists_for_catalogue(&self, catalogue_id: CatalogueId) -> DomainResult<bool> {
        Ok(self
            .state()?
            .associations
            .values()
            .any(|a| a.catalogue_id == catalogue_id))
    }

    async fn category_ids_for_catalogue(
        &self,
        catalogue_id: CatalogueId,
    ) -> DomainResult<Vec<CategoryId>> {
        let state = self.state()?;
        let mut rows: Vec<&CatalogueCategory> = state
            .associations
            .values()
            .filter(|a| a.catalogue_id == catalogue_id)
            .collect();
        rows.sort_by_key(|a| a.id);
        Ok(rows.into_iter().map(|a| a.category_id).collect())
    }

    async fn catalogue_refs_for_category(
        &self,
        category_id: CategoryId,
    ) -> DomainResult<Vec<CatalogueRef>> {
        let state = self.state()?;
        let mut ids: Vec<CatalogueId> = state
            .associations
            .values()
            .filter(|a| a.category_id == category_id)
            .map(|a| a.catalogue_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids
            .into_iter()
            .filter_map(|id| {
                state.catalogues.get(&id).map(|c| CatalogueRef {
                    catalogue_id: c.id,
                    name: c.name.clone(),
                    description: c.description.clone(),
                })
            })
            .collect())
    }

    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let mut state = self.state()?;
        let doomed: Vec<CatalogueCategoryId> = state
            .associations
            .values()
            .filter(|a| a.category_id == category_id)
            .map(|a| a.id)
            .collect();
        for id in &doomed {
            state.associations.remove(id);
        }
        Ok(doomed.len() as u64)
    }

    async fn detail(&self, id: CatalogueCategoryId) -> DomainResult<Option<AssociationDetail>> {
        let state = self.state()?;
        Ok(state
            .associations
            .get(&id)
            .and_then(|a| state.association_detail_of(a)))
    }

    async fn list_details(
        &self,
        catalogue_id: Option<CatalogueId>,
    ) -> DomainResult<Vec<AssociationDetail>> {
        let state = self.state()?;
        Ok(state
            .sorted_associations()
            .iter()
            .filter(|a| catalogue_id.is_none_or(|c| a.catalogue_id == c))
            .filter_map(|a| state.association_detail_of(a))
            .collect())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: &Product) -> DomainResult<()> {
        self.state()?.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        self.state()?.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self.state()?.products.get(&id).cloned())
    }

    async fn delete(&self, id: ProductId) -> DomainResult<bool> {
        Ok(self.state()?.products.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Product>> {
        Ok(page.window(self.state()?.sorted_products()))
    }

    async fn list_by_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Product>> {
        let state = self.state()?;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(page.window(products))
    }

    async fn name_exists(&self, name: &str) -> DomainResult<bool> {
        Ok(self
            .state()?
            .products
            .values()
            .any(|p| eq_fold(&p.name, name)))
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Product>> {
        let state = self.state()?;
        let mut hits: Vec<Product> = state
            .products
            .values()
            .filter(|p| product_matches(p, term))
            .cloned()
            .collect();
        hits.sort_by_key(|p| p.id);
        Ok(hits)
    }

    async fn search_by_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Product>> {
        let state = self.state()?;
        let mut hits: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.seller_id == seller_id && product_matches(p, term))
            .cloned()
            .collect();
        hits.sort_by_key(|p| p.id);
        Ok(hits)
    }

    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let mut state = self.state()?;
        let doomed: Vec<ProductId> = state
            .products
            .values()
            .filter(|p| state.category_of(p) == Some(category_id))
            .map(|p| p.id)
            .collect();
        for id in &doomed {
            state.products.remove(id);
        }
        Ok(doomed.len() as u64)
    }

    async fn count_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let state = self.state()?;
        Ok(state
            .products
            .values()
            .filter(|p| state.category_of(p) == Some(category_id))
            .count() as u64)
    }

    async fn count_by_category_and_seller(
        &self,
        category_id: CategoryId,
        seller_id: SellerId,
    ) -> DomainResult<u64> {
        let state = self.state()?;
        Ok(state
            .products
            .values()
            .filter(|p| p.seller_id == seller_id && state.category_of(p) == Some(category_id))
            .count() as u64)
    }

    async fn placements_for_seller(
        &self,
        seller_id: SellerId,
    ) -> DomainResult<Vec<ProductPlacement>> {
        let state = self.state()?;
        Ok(state
            .sorted_products()
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .filter_map(|p| state.placement_of(p))
            .collect())
    }
}

fn product_matches(product: &Product, term: &str) -> bool {
    contains_fold(&product.name, term)
        || product
            .description
            .as_deref()
            .is_some_and(|d| contains_fold(d, term))
}

fn category_matches(category: &Category, term: &str) -> bool {
    contains_fold(&category.name, term)
        || category
            .description
            .as_deref()
            .is_some_and(|d| contains_fold(d, term))
}

#[async_trait]
impl ProductPriceStore for MemoryStore {
    async fn insert(&self, price: &ProductPrice) -> DomainResult<()> {
        self.state()?.prices.insert(price.id, price.clone());
        Ok(())
    }

    async fn update(&self, price: &ProductPrice) -> DomainResult<()> {
        self.state()?.prices.insert(price.id, price.clone());
        Ok(())
    }

    async fn get(&self, id: PriceId) -> DomainResult<Option<ProductPrice>> {
        Ok(self.state()?.prices.get(&id).cloned())
    }

    async fn delete(&self, id: PriceId) -> DomainResult<bool> {
        Ok(self.state()?.prices.remove(&id).is_some())
    }

    async fn find_by_product_and_currency(
        &self,
        product_id: ProductId,
        currency_id: CurrencyId,
    ) -> DomainResult<Option<ProductPrice>> {
        Ok(self
            .state()?
            .prices
            .values()
            .find(|p| p.product_id == product_id && p.currency_id == currency_id)
            .cloned())
    }

    async fn details_for_product(&self, product_id: ProductId) -> DomainResult<Vec<PriceDetail>> {
        let state = self.state()?;
        let mut rows: Vec<&ProductPrice> = state
            .prices
            .values()
            .filter(|p| p.product_id == product_id)
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows
            .into_iter()
            .filter_map(|p| state.price_detail_of(p))
            .collect())
    }

    async fn list_details(&self) -> DomainResult<Vec<PriceDetail>> {
        let state = self.state()?;
        let mut rows: Vec<&ProductPrice> = state.prices.values().collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows
            .into_iter()
            .filter_map(|p| state.price_detail_of(p))
            .collect())
    }

    async fn detail(&self, id: PriceId) -> DomainResult<Option<PriceDetail>> {
        let state = self.state()?;
        Ok(state.prices.get(&id).and_then(|p| state.price_detail_of(p)))
    }

    async fn delete_for_product(&self, product_id: ProductId) -> DomainResult<u64> {
        let mut state = self.state()?;
        let doomed: Vec<PriceId> = state
            .prices
            .values()
            .filter(|p| p.product_id == product_id)
            .map(|p| p.id)
            .collect();
        for id in &doomed {
            state.prices.remove(id);
        }
        Ok(doomed.len() as u64)
    }

    async fn delete_for_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let mut state = self.state()?;
        let doomed: Vec<PriceId> = state
            .prices
            .values()
            .filter(|price| {
                state
                    .products
                    .get(&price.product_id)
                    .and_then(|p| state.category_of(p))
                    == Some(category_id)
            })
            .map(|p| p.id)
            .collect();
        for id in &doomed {
            state.prices.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

#[async_trait]
impl CurrencyStore for MemoryStore {
    async fn insert(&self, currency: &Currency) -> DomainResult<()> {
        self.state()?
            .currencies
            .insert(currency.id, currency.clone());
        Ok(())
    }

    async fn get(&self, id: CurrencyId) -> DomainResult<Option<Currency>> {
        Ok(self.state()?.currencies.get(&id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Currency>> {
        let state = self.state()?;
        let mut currencies: Vec<Currency> = state.currencies.values().cloned().collect();
        currencies.sort_by_key(|c| c.id);
        Ok(currencies)
    }

    async fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.state()?.currencies.is_empty())
    }
}

#[async_trait]
impl AdminUserStore for MemoryStore {
    async fn insert(&self, user: &AdminUser) -> DomainResult<()> {
        self.state()?.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<AdminUser>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| eq_fold(&u.email, email))
            .cloned())
    }
}
