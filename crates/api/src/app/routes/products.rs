use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/search", get(search_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.products.create(&caller, draft).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services.products.list(&caller, params.page_request()).await {
        Ok(views) => errors::list_response(views),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::SearchTermParams>,
) -> axum::response::Response {
    let term = params.search_term.unwrap_or_default();
    match services.products.search(&caller, &term).await {
        Ok(views) => errors::list_response(views),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<ProductId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.products.get(&caller, id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id::<ProductId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.products.update(&caller, id, draft).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<ProductId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.products.delete(&caller, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
