use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// List every material with its current stock count, ordered by name.
pub async fn list_materials(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let materials = match services.store.list_materials().await {
        Ok(m) => m,
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(serde_json::json!({
        "materials": materials.iter().map(dto::material_to_json).collect::<Vec<_>>(),
    }))
    .into_response()
}
