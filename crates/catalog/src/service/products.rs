//! Product operations. This is the one resource sellers can write, so every
//! method resolves the caller's scope before touching data and enforces
//! ownership on single-product access.

use std::sync::Arc;

use webstore_auth::{AccessScope, Caller};
use webstore_core::{
    AuditStamp, CatalogueId, CategoryId, DomainError, DomainResult, PageRequest, ProductId,
    SellerId,
};

use crate::model::{Product, uniq_fold};
use crate::store::{CatalogueCategoryStore, ProductPriceStore, ProductStore, SellerStore};
use crate::views::ProductView;

/// Fields accepted when creating or updating a product. The placement is
/// named by its catalogue and category pair, not by the association row id.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock: i32,
    pub catalogue_id: CatalogueId,
    pub category_id: CategoryId,
    /// Ignored for seller callers; their own seller id always wins.
    pub seller_id: Option<SellerId>,
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    sellers: Arc<dyn SellerStore>,
    associations: Arc<dyn CatalogueCategoryStore>,
    prices: Arc<dyn ProductPriceStore>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        sellers: Arc<dyn SellerStore>,
        associations: Arc<dyn CatalogueCategoryStore>,
        prices: Arc<dyn ProductPriceStore>,
    ) -> Self {
        Self {
            products,
            sellers,
            associations,
            prices,
        }
    }

    pub async fn create(&self, caller: &Caller, draft: ProductDraft) -> DomainResult<ProductView> {
        let scope = caller.scope()?;
        validate(&draft)?;
        let seller_id = match scope.owner().or(draft.seller_id) {
            Some(seller_id) => seller_id,
            None => return Err(DomainError::validation("Seller ID is required")),
        };
        let association = self.resolve_placement(&draft).await?;
        self.require_seller(seller_id).await?;
        if self.products.name_exists(&draft.name).await? {
            return Err(DomainError::conflict("Product name already exists"));
        }
        let product = Product {
            id: ProductId::new(),
            name: draft.name,
            description: draft.description,
            image_url: draft.image_url,
            stock: draft.stock,
            catalogue_category_id: association.id,
            seller_id,
            audit: AuditStamp::new(caller.audit_name()),
        };
        self.products.insert(&product).await?;
        tracing::info!(product_id = %product.id, seller_id = %seller_id, "product created");
        self.assemble(product).await
    }

    pub async fn get(&self, caller: &Caller, id: ProductId) -> DomainResult<ProductView> {
        let scope = caller.scope()?;
        let product = self.require(id).await?;
        check_ownership(&scope, &product)?;
        self.assemble(product).await
    }

    pub async fn list(&self, caller: &Caller, page: PageRequest) -> DomainResult<Vec<ProductView>> {
        let scope = caller.scope()?;
        let products = match scope.owner() {
            Some(seller_id) => self.products.list_by_seller(seller_id, page).await?,
            None => self.products.list(page).await?,
        };
        self.assemble_all(products).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: ProductId,
        draft: ProductDraft,
    ) -> DomainResult<ProductView> {
        let scope = caller.scope()?;
        validate(&draft)?;
        let mut product = self.require(id).await?;
        check_ownership(&scope, &product)?;
        let seller_id = scope
            .owner()
            .or(draft.seller_id)
            .unwrap_or(product.seller_id);
        let association = self.resolve_placement(&draft).await?;
        self.require_seller(seller_id).await?;
        if uniq_fold(&draft.name) != uniq_fold(&product.name)
            && self.products.name_exists(&draft.name).await?
        {
            return Err(DomainError::conflict("Product name already exists"));
        }
        product.name = draft.name;
        product.description = draft.description;
        product.image_url = draft.image_url;
        product.stock = draft.stock;
        product.catalogue_category_id = association.id;
        product.seller_id = seller_id;
        product.audit.touch(caller.audit_name());
        self.products.update(&product).await?;
        self.assemble(product).await
    }

    /// Removes the product and its price lines.
    pub async fn delete(&self, caller: &Caller, id: ProductId) -> DomainResult<()> {
        let scope = caller.scope()?;
        let product = self.require(id).await?;
        check_ownership(&scope, &product)?;
        let prices = self.prices.delete_for_product(id).await?;
        self.products.delete(id).await?;
        tracing::info!(product_id = %id, prices, "product deleted");
        Ok(())
    }

    /// Blank terms fall back to the caller-scoped full listing; anything
    /// else matches name and description within the caller's scope.
    pub async fn search(&self, caller: &Caller, term: &str) -> DomainResult<Vec<ProductView>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(caller, PageRequest::all()).await;
        }
        let scope = caller.scope()?;
        let products = match scope.owner() {
            Some(seller_id) => self.products.search_by_seller(seller_id, term).await?,
            None => self.products.search(term).await?,
        };
        self.assemble_all(products).await
    }

    async fn resolve_placement(
        &self,
        draft: &ProductDraft,
    ) -> DomainResult<crate::model::CatalogueCategory> {
        self.associations
            .find_by_pair(draft.catalogue_id, draft.category_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "CatalogueCategory not found for Catalogue ID: {} and Category ID: {}",
                    draft.catalogue_id, draft.category_id
                ))
            })
    }

    async fn require_seller(&self, seller_id: SellerId) -> DomainResult<()> {
        if self.sellers.get(seller_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Seller not found with ID: {seller_id}"
            )));
        }
        Ok(())
    }

    async fn require(&self, id: ProductId) -> DomainResult<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product not found with ID: {id}")))
    }

    async fn assemble(&self, product: Product) -> DomainResult<ProductView> {
        let catalogue_category = self.associations.detail(product.catalogue_category_id).await?;
        let prices = self.prices.details_for_product(product.id).await?;
        Ok(ProductView {
            product,
            catalogue_category,
            prices,
        })
    }

    async fn assemble_all(&self, products: Vec<Product>) -> DomainResult<Vec<ProductView>> {
        let mut views = Vec::with_capacity(products.len());
        for product in products {
            views.push(self.assemble(product).await?);
        }
        Ok(views)
    }
}

fn check_ownership(scope: &AccessScope, product: &Product) -> DomainResult<()> {
    if !scope.permits(product.seller_id) {
        return Err(DomainError::forbidden(
            "Access denied: Product does not belong to your seller account",
        ));
    }
    Ok(())
}

fn validate(draft: &ProductDraft) -> DomainResult<()> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::validation("Product name should not be blank"));
    }
    Ok(())
}
