//! HTTP application wiring (Axum router + service construction).
//!
//! The folder is structured like:
//! - `services.rs`: service construction over the selected storage backend
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and their conversion into service drafts
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;

use webstore_auth::{GoogleApiVerifier, GoogleTokenVerifier, TokenService};
use webstore_infra::Stores;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Session tokens stay valid long enough to cover a working day.
const SESSION_TTL_HOURS: i64 = 10;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Reads `DATABASE_URL` (Postgres when set, in-memory stores otherwise),
/// `GOOGLE_CLIENT_ID` for login verification and `ADMIN_EMAIL` for the
/// bootstrap back-office account.
pub async fn build_app(jwt_secret: String) -> Router {
    let stores = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPool::connect(&url)
                .await
                .expect("failed to connect to DATABASE_URL");
            webstore_infra::ensure_schema(&pool)
                .await
                .expect("failed to prepare database schema");
            Stores::postgres(pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Stores::in_memory()
        }
    };

    let client_id = std::env::var("GOOGLE_CLIENT_ID").unwrap_or_else(|_| {
        tracing::warn!("GOOGLE_CLIENT_ID not set; Google logins will be rejected");
        String::new()
    });
    let verifier =
        Arc::new(GoogleApiVerifier::new(client_id).expect("failed to build Google token verifier"));

    build_app_with(stores, verifier, jwt_secret).await
}

/// Assemble the router over explicit collaborators. Tests use this to swap
/// in stub verifiers and in-memory stores.
pub async fn build_app_with(
    stores: Stores,
    verifier: Arc<dyn GoogleTokenVerifier>,
    jwt_secret: String,
) -> Router {
    let tokens = TokenService::new(&jwt_secret, chrono::Duration::hours(SESSION_TTL_HOURS));
    let services = Arc::new(services::AppServices::new(stores, verifier, tokens.clone()));

    if let Err(err) = services.currencies.seed_defaults().await {
        tracing::error!(error = %err, "failed to seed default currencies");
    }
    if let Ok(email) = std::env::var("ADMIN_EMAIL") {
        services.seed_admin(&email).await;
    }

    let auth_state = middleware::AuthState { tokens };

    let api = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
}
