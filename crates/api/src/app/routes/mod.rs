use axum::{routing::get, Router};

pub mod admin;
pub mod checkouts;
pub mod debtors;
pub mod materials;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/materiais/", get(materials::list_materials))
        .route(
            "/retirada/",
            get(checkouts::checkout_form).post(checkouts::submit_checkout),
        )
        .route("/devedores/", get(debtors::list_debtors))
        .nest("/admin", admin::router())
}
