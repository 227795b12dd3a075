use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// List every checkout still awaiting return, across all users, oldest first.
pub async fn list_debtors(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let checkouts = match services.store.list_open_checkouts().await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(serde_json::json!({
        "open_checkouts": checkouts.iter().map(dto::checkout_to_json).collect::<Vec<_>>(),
    }))
    .into_response()
}
