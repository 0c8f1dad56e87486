use axum::Router;

pub mod associations;
pub mod auth;
pub mod catalogues;
pub mod categories;
pub mod currencies;
pub mod prices;
pub mod products;
pub mod sellers;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/auth", auth::router())
            .nest("/sellers", sellers::router())
            .nest("/categories", categories::router())
            .nest("/catalogues", catalogues::router())
            .nest("/catalogue-categories", associations::router())
            .nest("/products", products::router())
            .nest("/product-prices", prices::router())
            .nest("/currencies", currencies::router()),
    )
}
