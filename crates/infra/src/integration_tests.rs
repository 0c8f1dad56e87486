//! Service-level tests over the in-memory backend.
//!
//! Exercises the flows that cross several stores at once:
//! - Owner scoping: sellers see and touch only their own products
//! - Category deletion cascading through prices, products and associations
//! - Uniqueness pre-checks (seller email, taxonomy names, price pairs)
//! - Seller details aggregation across the product placement join
//! - Login routing for sellers and back-office admins

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};

    use webstore_auth::{
        Caller, GoogleTokenVerifier, Principal, Role, TokenService, VerifiedIdentity, VerifyError,
    };
    use webstore_catalog::{
        AdminUser, AssociationDraft, AssociationService, Catalogue, CatalogueDraft,
        CatalogueService, CategoryDraft, CategoryService, CategoryView, CurrencyService,
        LoginRequest, LoginService, PriceDraft, PriceService, ProductDraft, ProductService,
        ProductView, Seller, SellerDraft, SellerService, SellerStatus,
    };
    use webstore_core::{AuditStamp, DomainError, PageRequest, UserId};

    use crate::Stores;

    struct World {
        stores: Stores,
        sellers: SellerService,
        categories: CategoryService,
        catalogues: CatalogueService,
        associations: AssociationService,
        products: ProductService,
        prices: PriceService,
        currencies: CurrencyService,
    }

    fn world() -> World {
        let stores = Stores::in_memory();
        let categories = CategoryService::new(
            stores.categories.clone(),
            stores.associations.clone(),
            stores.products.clone(),
            stores.prices.clone(),
        );
        World {
            sellers: SellerService::new(stores.sellers.clone(), stores.products.clone()),
            catalogues: CatalogueService::new(
                stores.catalogues.clone(),
                stores.associations.clone(),
                categories.clone(),
            ),
            associations: AssociationService::new(
                stores.associations.clone(),
                stores.catalogues.clone(),
                stores.categories.clone(),
            ),
            products: ProductService::new(
                stores.products.clone(),
                stores.sellers.clone(),
                stores.associations.clone(),
                stores.prices.clone(),
            ),
            prices: PriceService::new(
                stores.prices.clone(),
                stores.products.clone(),
                stores.currencies.clone(),
            ),
            currencies: CurrencyService::new(stores.currencies.clone()),
            categories,
            stores,
        }
    }

    fn admin() -> Caller {
        Caller::authenticated(Principal {
            email: "ops@webstore.test".into(),
            role: Role::Admin,
            seller_id: None,
            user_id: Some(UserId::new()),
        })
    }

    fn as_seller(seller: &Seller) -> Caller {
        Caller::authenticated(Principal {
            email: seller.email.clone(),
            role: Role::Seller,
            seller_id: Some(seller.id),
            user_id: None,
        })
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_seller(w: &World, name: &str, email: &str) -> Seller {
        w.sellers
            .create(
                &admin(),
                SellerDraft {
                    name: name.into(),
                    email: email.into(),
                    status: None,
                    joining_date: date(2024, 1, 15),
                },
            )
            .await
            .unwrap()
    }

    /// Creates a catalogue, a category, and the association joining them.
    async fn seed_placement(
        w: &World,
        catalogue: &str,
        category: &str,
    ) -> (Catalogue, CategoryView) {
        let caller = admin();
        let catalogue = w
            .catalogues
            .create(
                &caller,
                CatalogueDraft {
                    name: catalogue.into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let category = w
            .categories
            .create(
                &caller,
                CategoryDraft {
                    name: category.into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        w.associations
            .create(
                &caller,
                AssociationDraft {
                    catalogue_id: catalogue.id,
                    category_id: category.category.id,
                },
            )
            .await
            .unwrap();
        (catalogue, category)
    }

    async fn seed_product(
        w: &World,
        caller: &Caller,
        name: &str,
        catalogue: &Catalogue,
        category: &CategoryView,
        seller: &Seller,
    ) -> ProductView {
        w.products
            .create(
                caller,
                ProductDraft {
                    name: name.into(),
                    description: None,
                    image_url: None,
                    stock: 5,
                    catalogue_id: catalogue.id,
                    category_id: category.category.id,
                    seller_id: Some(seller.id),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn seller_email_uniqueness_is_enforced() {
        let w = world();
        seed_seller(&w, "Asha Traders", "asha@example.com").await;

        let err = w
            .sellers
            .create(
                &admin(),
                SellerDraft {
                    name: "Other Shop".into(),
                    email: "ASHA@example.com".into(),
                    status: None,
                    joining_date: date(2024, 3, 1),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict("Email already exists: ASHA@example.com")
        );
    }

    #[tokio::test]
    async fn sellers_only_see_their_own_products() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;

        seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;
        seed_product(&w, &admin(), "Laptop", &catalogue, &category, &bob).await;

        let mine = w
            .products
            .list(&as_seller(&alice), PageRequest::all())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].product.name, "Phone");

        let everything = w.products.list(&admin(), PageRequest::all()).await.unwrap();
        assert_eq!(everything.len(), 2);

        let err = w
            .products
            .list(&Caller::anonymous(), PageRequest::all())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn cross_seller_product_access_is_forbidden() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;
        let phone = seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;

        let err = w
            .products
            .get(&as_seller(&bob), phone.product.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::forbidden("Access denied: Product does not belong to your seller account")
        );

        let err = w
            .products
            .delete(&as_seller(&bob), phone.product.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        // The owner and the back office both still get through.
        assert!(
            w.products
                .get(&as_seller(&alice), phone.product.id)
                .await
                .is_ok()
        );
        assert!(w.products.get(&admin(), phone.product.id).await.is_ok());
    }

    #[tokio::test]
    async fn product_creation_requires_an_existing_placement() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let caller = admin();
        let catalogue = w
            .catalogues
            .create(
                &caller,
                CatalogueDraft {
                    name: "Summer".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let category = w
            .categories
            .create(
                &caller,
                CategoryDraft {
                    name: "Electronics".into(),
                    description: None,
                },
            )
            .await
            .unwrap();

        // No association row joins the pair yet.
        let err = w
            .products
            .create(
                &caller,
                ProductDraft {
                    name: "Phone".into(),
                    description: None,
                    image_url: None,
                    stock: 1,
                    catalogue_id: catalogue.id,
                    category_id: category.category.id,
                    seller_id: Some(alice.id),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::not_found(format!(
                "CatalogueCategory not found for Catalogue ID: {} and Category ID: {}",
                catalogue.id, category.category.id
            ))
        );
    }

    #[tokio::test]
    async fn seller_callers_always_own_what_they_create() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;

        // Alice names Bob in the draft; her own id wins anyway.
        let product =
            seed_product(&w, &as_seller(&alice), "Phone", &catalogue, &category, &bob).await;
        assert_eq!(product.product.seller_id, alice.id);
    }

    #[tokio::test]
    async fn category_delete_cascades_through_prices_products_and_associations() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;
        let phone = seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;

        w.currencies.seed_defaults().await.unwrap();
        let usd = w.currencies.list().await.unwrap()[0].clone();
        let price = w
            .prices
            .create(
                &admin(),
                PriceDraft {
                    product_id: phone.product.id,
                    currency_id: usd.id,
                    amount_minor: 19_999,
                },
            )
            .await
            .unwrap();

        w.categories
            .delete(&admin(), category.category.id)
            .await
            .unwrap();

        let err = w.products.get(&admin(), phone.product.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = w.prices.get(price.price_id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(w.associations.list(None).await.unwrap().is_empty());

        // The catalogue itself survives and is now freely deletable.
        w.catalogues.delete(&admin(), catalogue.id).await.unwrap();
    }

    #[tokio::test]
    async fn catalogue_delete_is_blocked_while_categories_remain() {
        let w = world();
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;

        let err = w
            .catalogues
            .delete(&admin(), catalogue.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict(
                "Cannot delete catalogue. Please delete the corresponding categories first, \
                 then you can delete the catalogue."
            )
        );

        let association = w.associations.list(Some(catalogue.id)).await.unwrap();
        assert_eq!(association.len(), 1);
        assert_eq!(association[0].category_id, category.category.id);
        w.associations.delete(association[0].id).await.unwrap();

        w.catalogues.delete(&admin(), catalogue.id).await.unwrap();
    }

    #[tokio::test]
    async fn category_view_counts_only_the_callers_products() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;
        seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;
        seed_product(&w, &admin(), "Laptop", &catalogue, &category, &bob).await;

        let global = w
            .categories
            .get(&admin(), category.category.id)
            .await
            .unwrap();
        assert_eq!(global.product_count, 2);
        assert_eq!(global.catalogues.len(), 1);
        assert_eq!(global.catalogues[0].name, "Summer");

        let scoped = w
            .categories
            .get(&as_seller(&alice), category.category.id)
            .await
            .unwrap();
        assert_eq!(scoped.product_count, 1);
    }

    #[tokio::test]
    async fn seller_details_groups_placements_by_catalogue_and_category() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let (summer, electronics) = seed_placement(&w, "Summer", "Electronics").await;
        let (winter, apparel) = seed_placement(&w, "Winter", "Apparel").await;

        seed_product(&w, &admin(), "Phone", &summer, &electronics, &alice).await;
        seed_product(&w, &admin(), "Tablet", &summer, &electronics, &alice).await;
        seed_product(&w, &admin(), "Coat", &winter, &apparel, &alice).await;

        let details = w.sellers.details(alice.id).await.unwrap();
        assert_eq!(details.name, "Alice Goods");
        assert_eq!(details.catalogues.len(), 2);

        let summer_details = &details.catalogues[0];
        assert_eq!(summer_details.name, "Summer");
        assert_eq!(summer_details.categories.len(), 1);
        assert_eq!(summer_details.categories[0].name, "Electronics");
        assert_eq!(summer_details.categories[0].product_count, 2);

        let winter_details = &details.catalogues[1];
        assert_eq!(winter_details.name, "Winter");
        assert_eq!(winter_details.categories[0].product_count, 1);
    }

    #[tokio::test]
    async fn price_rows_are_unique_per_product_and_currency() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;
        let phone = seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;
        w.currencies.seed_defaults().await.unwrap();
        let usd = w.currencies.list().await.unwrap()[0].clone();

        let err = w
            .prices
            .create(
                &admin(),
                PriceDraft {
                    product_id: phone.product.id,
                    currency_id: usd.id,
                    amount_minor: -1,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Price amount must not be negative")
        );

        w.prices
            .create(
                &admin(),
                PriceDraft {
                    product_id: phone.product.id,
                    currency_id: usd.id,
                    amount_minor: 19_999,
                },
            )
            .await
            .unwrap();
        let err = w
            .prices
            .create(
                &admin(),
                PriceDraft {
                    product_id: phone.product.id,
                    currency_id: usd.id,
                    amount_minor: 24_999,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict("Price already exists for this product and currency")
        );
    }

    #[tokio::test]
    async fn currency_seeding_is_idempotent() {
        let w = world();
        assert_eq!(w.currencies.seed_defaults().await.unwrap(), 4);
        assert_eq!(w.currencies.seed_defaults().await.unwrap(), 0);
        let codes: Vec<String> = w
            .currencies
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, ["USD", "EUR", "GBP", "INR"]);
    }

    struct StubVerifier {
        identity: Option<VerifiedIdentity>,
    }

    #[async_trait]
    impl GoogleTokenVerifier for StubVerifier {
        async fn verify(&self, _id_token: &str) -> Result<VerifiedIdentity, VerifyError> {
            self.identity.clone().ok_or(VerifyError::Rejected)
        }
    }

    fn login_service(stores: &Stores, identity: Option<VerifiedIdentity>) -> LoginService {
        LoginService::new(
            Arc::new(StubVerifier { identity }),
            TokenService::new("test-secret", Duration::hours(1)),
            stores.sellers.clone(),
            stores.users.clone(),
        )
    }

    fn google_identity(email: &str, name: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            email: email.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn seller_login_issues_a_verifiable_session_token() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let login = login_service(&w.stores, Some(google_identity("alice@example.com", "Alice")));

        let outcome = login
            .login(LoginRequest {
                google_token: "stub".into(),
                user_type: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome.role, Role::Seller);
        assert_eq!(outcome.seller_id, Some(alice.id));
        assert_eq!(outcome.name, "Alice Goods");

        let tokens = TokenService::new("test-secret", Duration::hours(1));
        let principal = tokens.verify(&outcome.jwt_token).unwrap();
        assert_eq!(principal.seller_id, Some(alice.id));
        assert_eq!(principal.role, Role::Seller);
    }

    #[tokio::test]
    async fn login_rejects_unknown_inactive_and_unverified_callers() {
        let w = world();
        let login = login_service(&w.stores, Some(google_identity("ghost@example.com", "Ghost")));
        let err = login
            .login(LoginRequest {
                google_token: "stub".into(),
                user_type: Some("SELLER".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::not_found("Seller not found with email: ghost@example.com")
        );

        let dormant = w
            .sellers
            .create(
                &admin(),
                SellerDraft {
                    name: "Dormant Shop".into(),
                    email: "dormant@example.com".into(),
                    status: Some(SellerStatus::Inactive),
                    joining_date: date(2023, 6, 1),
                },
            )
            .await
            .unwrap();
        let login = login_service(&w.stores, Some(google_identity(&dormant.email, "Dormant")));
        let err = login
            .login(LoginRequest {
                google_token: "stub".into(),
                user_type: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::forbidden("Seller account is not active"));

        let login = login_service(&w.stores, None);
        let err = login
            .login(LoginRequest {
                google_token: "garbage".into(),
                user_type: None,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::unauthorized("Authentication failed: Invalid Google token")
        );
    }

    #[tokio::test]
    async fn admin_login_requires_an_admin_user_row() {
        let w = world();
        w.stores
            .users
            .insert(&AdminUser {
                id: UserId::new(),
                username: "ops".into(),
                full_name: Some("Back Office".into()),
                email: "ops@example.com".into(),
                role: "ADMIN".into(),
                audit: AuditStamp::new("seed"),
            })
            .await
            .unwrap();
        w.stores
            .users
            .insert(&AdminUser {
                id: UserId::new(),
                username: "viewer".into(),
                full_name: None,
                email: "viewer@example.com".into(),
                role: "SUPPORT".into(),
                audit: AuditStamp::new("seed"),
            })
            .await
            .unwrap();

        let login = login_service(&w.stores, Some(google_identity("ops@example.com", "Ops")));
        let outcome = login
            .login(LoginRequest {
                google_token: "stub".into(),
                user_type: Some("ADMIN".into()),
            })
            .await
            .unwrap();
        assert_eq!(outcome.role, Role::Admin);
        assert!(outcome.user_id.is_some());
        assert_eq!(outcome.name, "Back Office");

        let login = login_service(&w.stores, Some(google_identity("viewer@example.com", "V")));
        let err = login
            .login(LoginRequest {
                google_token: "stub".into(),
                user_type: Some("ADMIN".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::forbidden("User with email viewer@example.com is not an admin")
        );
    }

    #[tokio::test]
    async fn blank_search_terms_fall_back_to_scoped_listings() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (catalogue, category) = seed_placement(&w, "Summer", "Electronics").await;
        seed_product(&w, &admin(), "Phone", &catalogue, &category, &alice).await;
        seed_product(&w, &admin(), "Laptop", &catalogue, &category, &bob).await;

        let results = w.products.search(&as_seller(&alice), "  ").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.name, "Phone");

        let results = w.products.search(&admin(), "pho").await.unwrap();
        assert_eq!(results.len(), 1);

        let results = w.catalogues.search(&as_seller(&bob), "").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Summer");
    }

    #[tokio::test]
    async fn category_search_respects_the_sellers_scope() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let bob = seed_seller(&w, "Bob Wares", "bob@example.com").await;
        let (summer, electronics) = seed_placement(&w, "Summer", "Electronics").await;
        let (winter, apparel) = seed_placement(&w, "Winter", "Apparel").await;
        seed_product(&w, &admin(), "Phone", &summer, &electronics, &alice).await;
        seed_product(&w, &admin(), "Coat", &winter, &apparel, &bob).await;

        // "el" hits both Electronics and Apparel by name.
        let hits = w.categories.search(&admin(), "el").await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = w.categories.search(&as_seller(&alice), "el").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category.name, "Electronics");

        let hits = w
            .categories
            .search(&as_seller(&alice), "Apparel")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn product_views_carry_their_resolved_placement() {
        let w = world();
        let alice = seed_seller(&w, "Alice Goods", "alice@example.com").await;
        let (summer, electronics) = seed_placement(&w, "Summer", "Electronics").await;
        let view = seed_product(&w, &admin(), "Phone", &summer, &electronics, &alice).await;

        let placement = view.catalogue_category.unwrap();
        assert_eq!(placement.catalogue_name, "Summer");
        assert_eq!(placement.category_name, "Electronics");
        assert_eq!(placement.catalogue_id, summer.id);

        let fetched = w
            .products
            .get(&as_seller(&alice), view.product.id)
            .await
            .unwrap();
        assert!(fetched.catalogue_category.is_some());
    }
}
