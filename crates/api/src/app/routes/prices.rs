use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_core::{PriceId, ProductId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_price).get(list_prices))
        .route("/product/:productId", get(prices_for_product))
        .route(
            "/:id",
            get(get_price).put(update_price).delete(delete_price),
        )
}

pub async fn create_price(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::PriceRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.prices.create(&caller, draft).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_prices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.prices.list().await {
        Ok(details) => errors::list_response(details),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn prices_for_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<ProductId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.prices.list_for_product(id).await {
        Ok(details) => errors::list_response(details),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<PriceId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.prices.get(id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// Only the amount of a line can change.
pub async fn update_price(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::PriceUpdateRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id::<PriceId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.prices.update_amount(&caller, id, body.amount).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<PriceId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.prices.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
