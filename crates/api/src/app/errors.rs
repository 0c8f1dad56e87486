use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use webstore_auth::Caller;
use webstore_core::DomainError;

/// Maps a service error onto the wire contract.
///
/// Conflicts surface as 400 rather than 409; clients treat uniqueness
/// failures like any other rejected input.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "conflict", msg),
        DomainError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        DomainError::Unauthorized(msg) => json_error(StatusCode::UNAUTHORIZED, "unauthorized", msg),
        DomainError::Storage(msg) => storage_error(msg),
    }
}

/// Backend faults are logged in full but answered with a generic body
/// unless `WEBSTORE_VERBOSE_ERRORS` opts into detail (dev setups only).
fn storage_error(msg: String) -> axum::response::Response {
    tracing::error!(error = %msg, "storage failure");
    let body = if verbose_errors() {
        msg
    } else {
        "internal server error".to_string()
    };
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", body)
}

fn verbose_errors() -> bool {
    std::env::var("WEBSTORE_VERBOSE_ERRORS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parses a path or query identifier, answering 400 on malformed input.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(domain_error_to_response)
}

/// Collection endpoints answer 204 instead of an empty JSON array.
pub fn list_response<T: serde::Serialize>(items: Vec<T>) -> axum::response::Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::OK, axum::Json(items)).into_response()
    }
}

/// Admin-only writes answer 403 for seller tokens before touching data.
pub fn deny_seller(caller: &Caller, message: &str) -> Result<(), axum::response::Response> {
    if caller.is_seller() {
        return Err(json_error(StatusCode::FORBIDDEN, "forbidden", message));
    }
    Ok(())
}
