//! Storage backends for the catalog store ports.
//!
//! Two backends implement every port: [`MemoryStore`] for tests and
//! local development, [`PgStore`] for deployments with a Postgres
//! `DATABASE_URL`. [`Stores`] bundles one handle per port so the rest
//! of the application never knows which backend it got.

use std::sync::Arc;

use sqlx::PgPool;

use webstore_catalog::store::{
    AdminUserStore, CatalogueCategoryStore, CatalogueStore, CategoryStore, CurrencyStore,
    ProductPriceStore, ProductStore, SellerStore,
};

pub mod memory;
pub mod postgres;
pub mod schema;

mod integration_tests;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::ensure_schema;

/// One handle per store port, all backed by the same storage engine.
#[derive(Clone)]
pub struct Stores {
    pub sellers: Arc<dyn SellerStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub catalogues: Arc<dyn CatalogueStore>,
    pub associations: Arc<dyn CatalogueCategoryStore>,
    pub products: Arc<dyn ProductStore>,
    pub prices: Arc<dyn ProductPriceStore>,
    pub currencies: Arc<dyn CurrencyStore>,
    pub users: Arc<dyn AdminUserStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    /// Wraps an existing pool; call [`ensure_schema`] before serving.
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SellerStore
            + CategoryStore
            + CatalogueStore
            + CatalogueCategoryStore
            + ProductStore
            + ProductPriceStore
            + CurrencyStore
            + AdminUserStore
            + 'static,
    {
        Self {
            sellers: backend.clone(),
            categories: backend.clone(),
            catalogues: backend.clone(),
            associations: backend.clone(),
            products: backend.clone(),
            prices: backend.clone(),
            currencies: backend.clone(),
            users: backend,
        }
    }
}
