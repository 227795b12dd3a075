use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use estoque_core::DomainError;
use estoque_infra::{CheckoutError, StoreError};

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

/// Validation failures carry the per-row field errors in the body so a form
/// renderer can attach each message to the offending row.
pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    match err {
        CheckoutError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": "one or more rows are invalid",
                "rows": errors,
            })),
        )
            .into_response(),
        CheckoutError::Domain(e) => domain_error_to_response(e),
        CheckoutError::Store(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::MaterialNotFound(_) | StoreError::CheckoutNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        StoreError::InsufficientStock { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            err.to_string(),
        ),
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Database(e) => {
            tracing::error!(error = %e, "database failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage failure")
        }
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "storage backend failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage failure")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}
