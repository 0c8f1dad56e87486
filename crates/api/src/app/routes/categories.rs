use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_core::CategoryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route("/search", get(search_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot create categories") {
        return resp;
    }
    match services.categories.create(&caller, body.into()).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services.categories.list(&caller, params.page_request()).await {
        Ok(views) => errors::list_response(views),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn search_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::KeywordParam>,
) -> axum::response::Response {
    let keyword = params.keyword.unwrap_or_default();
    match services.categories.search(&caller, &keyword).await {
        Ok(views) => errors::list_response(views),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<CategoryId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.categories.get(&caller, id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot update categories") {
        return resp;
    }
    let id = match errors::parse_id::<CategoryId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.categories.update(&caller, id, body.into()).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot delete categories") {
        return resp;
    }
    let id = match errors::parse_id::<CategoryId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.categories.delete(&caller, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
