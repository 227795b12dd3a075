use serde::Deserialize;
use serde_json::json;

use estoque_inventory::{Checkout, Material};
use estoque_core::Entity;

// -------------------------
// Request DTOs
// -------------------------

/// One row of the checkout form. Fields are optional because the form may
/// submit extra blank rows, and partially filled rows must be reported as
/// field errors rather than rejected by deserialization.
#[derive(Debug, Deserialize)]
pub struct CheckoutRowRequest {
    pub material: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutBatchRequest {
    pub rows: Vec<CheckoutRowRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub available_quantity: i64,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplenishRequest {
    pub amount: i64,
}

// -------------------------
// Response mapping
// -------------------------

pub fn material_to_json(material: &Material) -> serde_json::Value {
    json!({
        "id": material.id().to_string(),
        "name": material.name(),
        "description": material.description(),
        "available_quantity": material.available_quantity(),
        "image": material.image(),
    })
}

pub fn checkout_to_json(checkout: &Checkout) -> serde_json::Value {
    json!({
        "id": checkout.id().to_string(),
        "user_id": checkout.user_id().to_string(),
        "material_id": checkout.material_id().to_string(),
        "quantity": checkout.quantity(),
        "checkout_time": checkout.checkout_time().to_rfc3339(),
        "return_time": checkout.return_time().map(|t| t.to_rfc3339()),
    })
}
