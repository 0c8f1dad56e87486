use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use webstore_auth::{Caller, TokenService};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
}

/// Resolves the caller for every request under `/api`.
///
/// A missing or non-Bearer `Authorization` header yields an anonymous
/// caller. A Bearer token that fails verification ends the request with
/// 401 instead of downgrading to anonymous.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = match bearer_token(req.headers()) {
        Some(token) => match state.tokens.verify(token) {
            Ok(principal) => Caller::authenticated(principal),
            Err(err) => {
                return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", err.to_string());
            }
        },
        None => Caller::anonymous(),
    };

    req.extensions_mut().insert(caller);
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    Some(header.strip_prefix("Bearer ")?.trim())
}
