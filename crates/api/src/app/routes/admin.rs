//! Administrative surface: material registration, stock replenishment and
//! checkout bookkeeping. Every handler requires the `inventory.manage`
//! permission.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use estoque_auth::Permission;
use estoque_core::{CheckoutId, Entity, MaterialId};
use estoque_inventory::Material;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/materiais", post(create_material))
        .route("/materiais/:id/reabastecer", post(replenish_material))
        .route("/retiradas", get(list_checkouts))
        .route("/retiradas/:id/devolucao", post(mark_returned))
}

fn guard(user: &CurrentUser) -> Result<(), axum::response::Response> {
    crate::authz::require_permission(user, &Permission::new("inventory.manage"))
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}

pub async fn create_material(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateMaterialRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard(&user) {
        return resp;
    }

    let material = match Material::new(
        MaterialId::new(),
        body.name,
        body.description,
        body.available_quantity,
        body.image,
    ) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let json = dto::material_to_json(&material);
    if let Err(e) = services.store.insert_material(material).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(user = %user.user_id(), "material registered");
    (StatusCode::CREATED, Json(json)).into_response()
}

pub async fn replenish_material(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReplenishRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard(&user) {
        return resp;
    }

    let id: MaterialId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid material id")
        }
    };

    match services.store.replenish_material(id, body.amount).await {
        Ok(material) => Json(dto::material_to_json(&material)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_checkouts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = guard(&user) {
        return resp;
    }

    let checkouts = match services.store.list_checkouts().await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(serde_json::json!({
        "checkouts": checkouts.iter().map(dto::checkout_to_json).collect::<Vec<_>>(),
    }))
    .into_response()
}

pub async fn mark_returned(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = guard(&user) {
        return resp;
    }

    let id: CheckoutId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid checkout id")
        }
    };

    match services.store.mark_returned(id, Utc::now()).await {
        Ok(checkout) => {
            tracing::info!(user = %user.user_id(), checkout = %checkout.id(), "checkout returned");
            Json(dto::checkout_to_json(&checkout)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
