use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_core::{CatalogueCategoryId, CatalogueId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_association).get(list_associations))
        .route("/:id", get(get_association).delete(delete_association))
}

pub async fn create_association(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::AssociationRequest>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot create catalogue categories") {
        return resp;
    }
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.associations.create(&caller, draft).await {
        Ok(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_associations(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::AssociationListParams>,
) -> axum::response::Response {
    let catalogue_id = match params.catalogue_id {
        Some(raw) => match errors::parse_id::<CatalogueId>(&raw) {
            Ok(id) => Some(id),
            Err(resp) => return resp,
        },
        None => None,
    };
    match services.associations.list(catalogue_id).await {
        Ok(details) => errors::list_response(details),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_association(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<CatalogueCategoryId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.associations.get(id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_association(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = errors::deny_seller(&caller, "Sellers cannot delete catalogue categories") {
        return resp;
    }
    let id = match errors::parse_id::<CatalogueCategoryId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.associations.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
