//! Category taxonomy operations.
//!
//! Every category read is served enriched: the product count and the list
//! of catalogues referencing the category ride along with the record. The
//! count follows the caller's scope, so a seller sees how many of their own
//! products sit in the category while everyone else sees the global count.

use std::sync::Arc;

use webstore_auth::Caller;
use webstore_core::{AuditStamp, CategoryId, DomainError, DomainResult, PageRequest};

use crate::model::{Category, uniq_fold};
use crate::store::{CatalogueCategoryStore, CategoryStore, ProductPriceStore, ProductStore};
use crate::views::CategoryView;

/// Fields accepted when creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    associations: Arc<dyn CatalogueCategoryStore>,
    products: Arc<dyn ProductStore>,
    prices: Arc<dyn ProductPriceStore>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        associations: Arc<dyn CatalogueCategoryStore>,
        products: Arc<dyn ProductStore>,
        prices: Arc<dyn ProductPriceStore>,
    ) -> Self {
        Self {
            categories,
            associations,
            products,
            prices,
        }
    }

    pub async fn create(&self, caller: &Caller, draft: CategoryDraft) -> DomainResult<CategoryView> {
        validate(&draft)?;
        if self.categories.name_exists(&draft.name).await? {
            return Err(DomainError::conflict("Category name already exists"));
        }
        let category = Category {
            id: CategoryId::new(),
            name: draft.name,
            description: draft.description,
            audit: AuditStamp::new(caller.audit_name()),
        };
        self.categories.insert(&category).await?;
        tracing::info!(category_id = %category.id, "category created");
        self.enrich(caller, category).await
    }

    pub async fn get(&self, caller: &Caller, id: CategoryId) -> DomainResult<CategoryView> {
        caller.scope()?;
        let category = self.require(id).await?;
        self.enrich(caller, category).await
    }

    /// Sellers get the categories their products are placed in; everyone
    /// else gets the full taxonomy.
    pub async fn list(&self, caller: &Caller, page: PageRequest) -> DomainResult<Vec<CategoryView>> {
        let scope = caller.scope()?;
        let categories = match scope.owner() {
            Some(seller_id) => self.categories.list_for_seller(seller_id, page).await?,
            None => self.categories.list(page).await?,
        };
        self.enrich_all(caller, categories).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> DomainResult<CategoryView> {
        validate(&draft)?;
        let mut category = self.require(id).await?;
        if uniq_fold(&draft.name) != uniq_fold(&category.name)
            && self.categories.name_exists(&draft.name).await?
        {
            return Err(DomainError::conflict(format!(
                "Category with name {} already exists",
                draft.name
            )));
        }
        category.name = draft.name;
        category.description = draft.description;
        category.audit.touch(caller.audit_name());
        self.categories.update(&category).await?;
        self.enrich(caller, category).await
    }

    /// Removes the category and everything hanging off it, in dependency
    /// order: prices of products in the category, then the products, then
    /// the catalogue associations, then the category itself. Each step is
    /// durable on its own; there is no cross-step transaction.
    pub async fn delete(&self, caller: &Caller, id: CategoryId) -> DomainResult<()> {
        caller.scope()?;
        self.require(id).await?;
        let prices = self.prices.delete_for_category(id).await?;
        let products = self.products.delete_by_category(id).await?;
        let associations = self.associations.delete_by_category(id).await?;
        self.categories.delete(id).await?;
        tracing::info!(
            category_id = %id,
            prices,
            products,
            associations,
            "category deleted with dependents"
        );
        Ok(())
    }

    /// Blank terms fall back to the caller-scoped first hundred categories;
    /// anything else matches name and description within the caller's scope.
    pub async fn search(&self, caller: &Caller, term: &str) -> DomainResult<Vec<CategoryView>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(caller, PageRequest::new(0, 100)).await;
        }
        let scope = caller.scope()?;
        let categories = match scope.owner() {
            Some(seller_id) => self.categories.search_for_seller(seller_id, term).await?,
            None => self.categories.search(term).await?,
        };
        self.enrich_all(caller, categories).await
    }

    pub(crate) async fn enrich(
        &self,
        caller: &Caller,
        category: Category,
    ) -> DomainResult<CategoryView> {
        let scope = caller.scope()?;
        let catalogues = self
            .associations
            .catalogue_refs_for_category(category.id)
            .await?;
        let product_count = match scope.owner() {
            Some(seller_id) => {
                self.products
                    .count_by_category_and_seller(category.id, seller_id)
                    .await?
            }
            None => self.products.count_by_category(category.id).await?,
        };
        Ok(CategoryView {
            category,
            product_count,
            catalogues,
        })
    }

    async fn enrich_all(
        &self,
        caller: &Caller,
        categories: Vec<Category>,
    ) -> DomainResult<Vec<CategoryView>> {
        let mut views = Vec::with_capacity(categories.len());
        for category in categories {
            views.push(self.enrich(caller, category).await?);
        }
        Ok(views)
    }

    pub(crate) async fn require(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category not found with ID: {id}")))
    }
}

fn validate(draft: &CategoryDraft) -> DomainResult<()> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Category name should not be blank"));
    }
    let name_len = name.chars().count();
    if !(2..=50).contains(&name_len) {
        return Err(DomainError::validation(
            "Category name must be between 2 and 50 characters",
        ));
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > 100 {
            return Err(DomainError::validation(
                "Category description must not exceed 100 characters",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_bounds() {
        let ok = CategoryDraft {
            name: "Electronics".to_string(),
            description: None,
        };
        assert!(validate(&ok).is_ok());
        let short = CategoryDraft {
            name: "E".to_string(),
            description: None,
        };
        assert!(validate(&short).is_err());
        let long = CategoryDraft {
            name: "x".repeat(51),
            description: None,
        };
        assert!(validate(&long).is_err());
    }

    #[test]
    fn description_capped_at_hundred() {
        let draft = CategoryDraft {
            name: "Electronics".to_string(),
            description: Some("d".repeat(101)),
        };
        assert!(validate(&draft).is_err());
    }
}
