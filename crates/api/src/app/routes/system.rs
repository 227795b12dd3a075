use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::CurrentUser;

/// Public landing page: a small service descriptor pointing at the
/// main endpoints.
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "estoque",
        "endpoints": ["/materiais/", "/retirada/", "/devedores/"],
    }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": user.user_id().to_string(),
        "roles": user.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
