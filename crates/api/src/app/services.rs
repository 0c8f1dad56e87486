use std::sync::Arc;

use webstore_auth::{GoogleTokenVerifier, TokenService};
use webstore_catalog::model::AdminUser;
use webstore_catalog::{
    AssociationService, CatalogueService, CategoryService, CurrencyService, LoginService,
    PriceService, ProductService, SellerService,
};
use webstore_core::{AuditStamp, FALLBACK_ACTOR, UserId};
use webstore_infra::Stores;

/// Every service the handlers call, built once over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    pub stores: Stores,
    pub login: LoginService,
    pub sellers: SellerService,
    pub categories: CategoryService,
    pub catalogues: CatalogueService,
    pub associations: AssociationService,
    pub products: ProductService,
    pub prices: PriceService,
    pub currencies: CurrencyService,
}

impl AppServices {
    pub fn new(
        stores: Stores,
        verifier: Arc<dyn GoogleTokenVerifier>,
        tokens: TokenService,
    ) -> Self {
        let login = LoginService::new(
            verifier,
            tokens,
            stores.sellers.clone(),
            stores.users.clone(),
        );
        let sellers = SellerService::new(stores.sellers.clone(), stores.products.clone());
        let categories = CategoryService::new(
            stores.categories.clone(),
            stores.associations.clone(),
            stores.products.clone(),
            stores.prices.clone(),
        );
        let catalogues = CatalogueService::new(
            stores.catalogues.clone(),
            stores.associations.clone(),
            categories.clone(),
        );
        let associations = AssociationService::new(
            stores.associations.clone(),
            stores.catalogues.clone(),
            stores.categories.clone(),
        );
        let products = ProductService::new(
            stores.products.clone(),
            stores.sellers.clone(),
            stores.associations.clone(),
            stores.prices.clone(),
        );
        let prices = PriceService::new(
            stores.prices.clone(),
            stores.products.clone(),
            stores.currencies.clone(),
        );
        let currencies = CurrencyService::new(stores.currencies.clone());

        Self {
            stores,
            login,
            sellers,
            categories,
            catalogues,
            associations,
            products,
            prices,
            currencies,
        }
    }

    /// Makes sure `email` can sign in as an admin. Runs at startup when
    /// `ADMIN_EMAIL` is set; an existing account is left untouched.
    pub async fn seed_admin(&self, email: &str) {
        match self.stores.users.find_by_email(email).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let username = email
                    .split_once('@')
                    .map(|(local, _)| local.to_string())
                    .unwrap_or_else(|| email.to_string());
                let user = AdminUser {
                    id: UserId::new(),
                    username,
                    full_name: None,
                    email: email.to_string(),
                    role: "ADMIN".to_string(),
                    audit: AuditStamp::new(FALLBACK_ACTOR),
                };
                match self.stores.users.insert(&user).await {
                    Ok(()) => tracing::info!(email, "seeded admin user"),
                    Err(err) => tracing::error!(error = %err, "failed to seed admin user"),
                }
            }
            Err(err) => tracing::error!(error = %err, "failed to look up admin user"),
        }
    }
}
