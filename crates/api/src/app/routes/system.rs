use axum::http::StatusCode;

/// Liveness probe; mounted outside the auth middleware.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
