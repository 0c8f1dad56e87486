//! Catalogue operations, including the catalogue-to-categories drill-down.

use std::sync::Arc;

use webstore_auth::Caller;
use webstore_core::{AuditStamp, CatalogueId, DomainError, DomainResult, PageRequest};

use crate::model::Catalogue;
use crate::service::CategoryService;
use crate::store::{CatalogueCategoryStore, CatalogueStore};
use crate::views::CategoryView;

/// Fields accepted when creating or updating a catalogue.
#[derive(Debug, Clone)]
pub struct CatalogueDraft {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct CatalogueService {
    catalogues: Arc<dyn CatalogueStore>,
    associations: Arc<dyn CatalogueCategoryStore>,
    categories: CategoryService,
}

impl CatalogueService {
    pub fn new(
        catalogues: Arc<dyn CatalogueStore>,
        associations: Arc<dyn CatalogueCategoryStore>,
        categories: CategoryService,
    ) -> Self {
        Self {
            catalogues,
            associations,
            categories,
        }
    }

    pub async fn create(&self, caller: &Caller, draft: CatalogueDraft) -> DomainResult<Catalogue> {
        validate(&draft)?;
        let catalogue = Catalogue {
            id: CatalogueId::new(),
            name: draft.name,
            description: draft.description,
            audit: AuditStamp::new(caller.audit_name()),
        };
        self.catalogues.insert(&catalogue).await?;
        tracing::info!(catalogue_id = %catalogue.id, "catalogue created");
        Ok(catalogue)
    }

    pub async fn get(&self, id: CatalogueId) -> DomainResult<Catalogue> {
        self.catalogues
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Catalogue with id {id} not found")))
    }

    /// Sellers get the catalogues their products are placed in; everyone
    /// else gets all of them.
    pub async fn list(&self, caller: &Caller, page: PageRequest) -> DomainResult<Vec<Catalogue>> {
        let scope = caller.scope()?;
        match scope.owner() {
            Some(seller_id) => self.catalogues.list_for_seller(seller_id, page).await,
            None => self.catalogues.list(page).await,
        }
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: CatalogueId,
        draft: CatalogueDraft,
    ) -> DomainResult<Catalogue> {
        validate(&draft)?;
        let mut catalogue = self
            .catalogues
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Catalogue not found"))?;
        catalogue.name = draft.name;
        catalogue.description = draft.description;
        catalogue.audit.touch(caller.audit_name());
        self.catalogues.update(&catalogue).await?;
        Ok(catalogue)
    }

    /// A catalogue with category associations cannot be removed; the
    /// associations have to go first.
    pub async fn delete(&self, caller: &Caller, id: CatalogueId) -> DomainResult<()> {
        caller.scope()?;
        if self.catalogues.get(id).await?.is_none() {
            return Err(DomainError::not_found("Catalogue not found"));
        }
        if self.associations.exists_for_catalogue(id).await? {
            return Err(DomainError::conflict(
                "Cannot delete catalogue. Please delete the corresponding categories first, then you can delete the catalogue.",
            ));
        }
        self.catalogues.delete(id).await?;
        tracing::info!(catalogue_id = %id, "catalogue deleted");
        Ok(())
    }

    /// Blank terms fall back to the caller-scoped full listing; anything
    /// else matches against catalogue names within the caller's scope.
    pub async fn search(&self, caller: &Caller, name: &str) -> DomainResult<Vec<Catalogue>> {
        let name = name.trim();
        if name.is_empty() {
            return self.list(caller, PageRequest::all()).await;
        }
        let scope = caller.scope()?;
        match scope.owner() {
            Some(seller_id) => self.catalogues.search_for_seller(seller_id, name).await,
            None => self.catalogues.search(name).await,
        }
    }

    /// The categories associated with a catalogue, each enriched the same
    /// way a direct category read would be. A category that fails to load
    /// is skipped rather than failing the whole listing.
    pub async fn categories_of(
        &self,
        caller: &Caller,
        id: CatalogueId,
    ) -> DomainResult<Vec<CategoryView>> {
        caller.scope()?;
        if self.catalogues.get(id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Catalogue not found with ID: {id}"
            )));
        }
        let category_ids = self.associations.category_ids_for_catalogue(id).await?;
        let mut views = Vec::with_capacity(category_ids.len());
        for category_id in category_ids {
            match self.categories.get(caller, category_id).await {
                Ok(view) => views.push(view),
                Err(err) => {
                    tracing::warn!(
                        catalogue_id = %id,
                        category_id = %category_id,
                        error = %err,
                        "skipping category that failed to load"
                    );
                }
            }
        }
        Ok(views)
    }
}

fn validate(draft: &CatalogueDraft) -> DomainResult<()> {
    if draft.name.trim().is_empty() {
        return Err(DomainError::validation(
            "Catalogue name should not be blank",
        ));
    }
    if let Some(description) = &draft.description {
        if description.chars().count() > 100 {
            return Err(DomainError::validation(
                "Catalogue description must not exceed 100 characters",
            ));
        }
    }
    Ok(())
}
