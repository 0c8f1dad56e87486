//! Catalogue-to-category association rows.
//!
//! An association is what places a category inside a catalogue; products
//! then hang off the association. The pair is unique.

use std::sync::Arc;

use webstore_auth::Caller;
use webstore_core::{
    AuditStamp, CatalogueCategoryId, CatalogueId, CategoryId, DomainError, DomainResult,
};

use crate::model::{AssociationDetail, CatalogueCategory};
use crate::store::{CatalogueCategoryStore, CatalogueStore, CategoryStore};

/// The pair to associate.
#[derive(Debug, Clone)]
pub struct AssociationDraft {
    pub catalogue_id: CatalogueId,
    pub category_id: CategoryId,
}

#[derive(Clone)]
pub struct AssociationService {
    associations: Arc<dyn CatalogueCategoryStore>,
    catalogues: Arc<dyn CatalogueStore>,
    categories: Arc<dyn CategoryStore>,
}

impl AssociationService {
    pub fn new(
        associations: Arc<dyn CatalogueCategoryStore>,
        catalogues: Arc<dyn CatalogueStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            associations,
            catalogues,
            categories,
        }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        draft: AssociationDraft,
    ) -> DomainResult<AssociationDetail> {
        let catalogue = self
            .catalogues
            .get(draft.catalogue_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Catalogue not found with ID: {}",
                    draft.catalogue_id
                ))
            })?;
        let category = self
            .categories
            .get(draft.category_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Category not found with ID: {}",
                    draft.category_id
                ))
            })?;
        if self
            .associations
            .pair_exists(draft.catalogue_id, draft.category_id)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "CatalogueCategory already exists for Catalogue ID: {} and Category ID: {}",
                draft.catalogue_id, draft.category_id
            )));
        }
        let association = CatalogueCategory {
            id: CatalogueCategoryId::new(),
            catalogue_id: catalogue.id,
            category_id: category.id,
            audit: AuditStamp::new(caller.audit_name()),
        };
        self.associations.insert(&association).await?;
        tracing::info!(
            catalogue_id = %catalogue.id,
            category_id = %category.id,
            "catalogue category associated"
        );
        Ok(AssociationDetail {
            id: association.id,
            catalogue_id: catalogue.id,
            catalogue_name: catalogue.name,
            category_id: category.id,
            category_name: category.name,
            audit: association.audit,
        })
    }

    pub async fn get(&self, id: CatalogueCategoryId) -> DomainResult<AssociationDetail> {
        self.associations
            .detail(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// All association rows, optionally narrowed to one catalogue.
    pub async fn list(
        &self,
        catalogue_id: Option<CatalogueId>,
    ) -> DomainResult<Vec<AssociationDetail>> {
        self.associations.list_details(catalogue_id).await
    }

    pub async fn delete(&self, id: CatalogueCategoryId) -> DomainResult<()> {
        if !self.associations.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: CatalogueCategoryId) -> DomainError {
    DomainError::not_found(format!("CatalogueCategory not found with ID: {id}"))
}
