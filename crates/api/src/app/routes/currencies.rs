use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_currencies))
}

pub async fn list_currencies(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.currencies.list().await {
        Ok(currencies) => errors::list_response(currencies),
        Err(err) => errors::domain_error_to_response(err),
    }
}
