use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use chrono::Utc;

use estoque_core::MaterialId;
use estoque_inventory::{CheckoutRequest, RowError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

/// Form scaffold for a checkout submission: the selectable materials plus
/// one empty row for a multi-row form renderer to start from.
pub async fn checkout_form(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let materials = match services.store.list_materials().await {
        Ok(m) => m,
        Err(e) => return errors::store_error_to_response(e),
    };

    let blank = serde_json::json!({ "material": null, "quantity": null });
    Json(serde_json::json!({
        "materials": materials.iter().map(dto::material_to_json).collect::<Vec<_>>(),
        "rows": [blank],
    }))
    .into_response()
}

/// Submit a checkout batch.
///
/// Parses material ids up front so malformed ids surface as per-row field
/// errors next to the validation errors, not as a separate failure mode.
/// On success redirects to the materials listing.
pub async fn submit_checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CheckoutBatchRequest>,
) -> axum::response::Response {
    let mut rows = Vec::with_capacity(body.rows.len());
    let mut parse_errors = Vec::new();

    for (index, row) in body.rows.iter().enumerate() {
        let material_id = match row.material.as_deref() {
            Some(raw) => match raw.parse::<MaterialId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    parse_errors.push(RowError::new(index, "material", "invalid material id"));
                    None
                }
            },
            None => None,
        };
        rows.push(CheckoutRequest {
            material_id,
            quantity: row.quantity,
        });
    }

    if !parse_errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "validation_error",
                "message": "one or more rows are invalid",
                "rows": parse_errors,
            })),
        )
            .into_response();
    }

    match services
        .checkouts
        .submit_batch(user.user_id(), &rows, Utc::now())
        .await
    {
        Ok(_) => Redirect::to("/materiais/").into_response(),
        Err(e) => errors::checkout_error_to_response(e),
    }
}
