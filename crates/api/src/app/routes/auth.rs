use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/google", post(google_login))
}

/// Exchanges a Google ID token for a locally issued session token.
pub async fn google_login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::GoogleLoginRequest>,
) -> axum::response::Response {
    match services.login.login(body.into()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
