use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use webstore_auth::Caller;
use webstore_catalog::model::SellerStatus;
use webstore_core::SellerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_seller).get(list_sellers))
        .route("/search", get(search_sellers))
        .route("/status/:status", get(sellers_by_status))
        .route("/joined-after", get(sellers_joined_after))
        .route("/joined-between", get(sellers_joined_between))
        .route("/count/:status", get(count_sellers))
        .route(
            "/:id",
            get(get_seller).put(update_seller).delete(delete_seller),
        )
        .route("/:id/details", get(seller_details))
}

pub async fn create_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<dto::SellerRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.sellers.create(&caller, draft).await {
        Ok(seller) => (StatusCode::CREATED, Json(seller)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services.sellers.list(params.page_request()).await {
        Ok(sellers) => errors::list_response(sellers),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn search_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::KeywordParam>,
) -> axum::response::Response {
    let keyword = params.keyword.unwrap_or_default();
    match services.sellers.search(&keyword).await {
        Ok(sellers) => errors::list_response(sellers),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn sellers_by_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw): Path<String>,
) -> axum::response::Response {
    let status = match raw.parse::<SellerStatus>() {
        Ok(status) => status,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.sellers.by_status(status).await {
        Ok(sellers) => errors::list_response(sellers),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn sellers_joined_after(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::DateParam>,
) -> axum::response::Response {
    match services.sellers.joined_after(params.date).await {
        Ok(sellers) => errors::list_response(sellers),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn sellers_joined_between(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::DateRangeParams>,
) -> axum::response::Response {
    match services
        .sellers
        .joined_between(params.start_date, params.end_date)
        .await
    {
        Ok(sellers) => errors::list_response(sellers),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// Answers a bare JSON number.
pub async fn count_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw): Path<String>,
) -> axum::response::Response {
    let status = match raw.parse::<SellerStatus>() {
        Ok(status) => status,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.sellers.count_by_status(status).await {
        Ok(count) => (StatusCode::OK, Json(count)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<SellerId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.sellers.get(id).await {
        Ok(seller) => (StatusCode::OK, Json(seller)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<dto::SellerRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id::<SellerId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.sellers.update(&caller, id, draft).await {
        Ok(seller) => (StatusCode::OK, Json(seller)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<SellerId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.sellers.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// Seller profile plus their catalogue/category/product tree.
pub async fn seller_details(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id::<SellerId>(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.sellers.details(id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
