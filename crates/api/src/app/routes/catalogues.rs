use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_core::CatalogueId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_catalogue).get(list_catalogues))
        .route("/search", get(search_catalogues))
        .route(
            "/:id",
            get(get_catalogue)
                .put(update_catalogue)
                .delete(delete_catalogue),
        )
        .route("/:id/categories", get(catalogue_categories))
}

pub async fn create_catalogue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::CatalogueRequest>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot create catalogues") {
        return resp;
    }
    match services.catalogues.create(&caller, body.into()).await {
        Ok(catalogue) => (StatusCode::CREATED, Json(catalogue)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_catalogues(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services.catalogues.list(&caller, params.page_request()).await {
        Ok(catalogues) => errors::list_response(catalogues),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn search_catalogues(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<dto::NameParam>,
) -> axum::response::Response {
    let name = params.name.unwrap_or_default();
    match services.catalogues.search(&caller, &name).await {
        Ok(catalogues) => errors::list_response(catalogues),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_catalogue(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<CatalogueId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalogues.get(id).await {
        Ok(catalogue) => (StatusCode::OK, Json(catalogue)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_catalogue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::CatalogueRequest>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot update catalogues") {
        return resp;
    }
    let id = match errors::parse_id::<CatalogueId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalogues.update(&caller, id, body.into()).await {
        Ok(catalogue) => (StatusCode::OK, Json(catalogue)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_catalogue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot delete catalogues") {
        return resp;
    }
    let id = match errors::parse_id::<CatalogueId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalogues.delete(&caller, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// The categories associated with one catalogue, enriched like a direct
/// category read.
pub async fn catalogue_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<CatalogueId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.catalogues.categories_of(&caller, id).await {
        Ok(views) => errors::list_response(views),
        Err(err) => errors::domain_error_to_response(err),
    }
}
