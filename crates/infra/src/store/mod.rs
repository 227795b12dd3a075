//! Storage abstractions for materials and checkouts.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use estoque_core::{CheckoutId, DomainError, MaterialId};
use estoque_inventory::{Checkout, Material};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("material not found: {0}")]
    MaterialNotFound(MaterialId),

    #[error("checkout not found: {0}")]
    CheckoutNotFound(CheckoutId),

    /// A decrement would have taken the stock count below zero. The whole
    /// batch it belonged to was rolled back.
    #[error("insufficient stock for material {material_id}: requested {requested}, available {available}")]
    InsufficientStock {
        material_id: MaterialId,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Persistence boundary for the two inventory records.
///
/// `checkout_batch` is the only write path for `available_quantity` apart
/// from the administrative `replenish_material`. Implementations must apply
/// a batch atomically (every decrement and checkout row, or nothing) and
/// must enforce the stock floor: `available_quantity` never goes negative.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Register a new material. A duplicate id is an error, never an
    /// overwrite (Postgres enforces this via the primary key).
    async fn insert_material(&self, material: Material) -> Result<(), StoreError>;

    async fn get_material(&self, id: MaterialId) -> Result<Option<Material>, StoreError>;

    /// All materials, unfiltered, in display order.
    async fn list_materials(&self) -> Result<Vec<Material>, StoreError>;

    /// Administrative stock replenishment; returns the updated material.
    async fn replenish_material(&self, id: MaterialId, amount: i64) -> Result<Material, StoreError>;

    /// Atomically decrement stock and persist the checkout records.
    async fn checkout_batch(&self, checkouts: &[Checkout]) -> Result<(), StoreError>;

    /// Checkouts with no return timestamp (outstanding debts), for all users.
    async fn list_open_checkouts(&self) -> Result<Vec<Checkout>, StoreError>;

    /// Every checkout, open and returned (administrative inspection).
    async fn list_checkouts(&self) -> Result<Vec<Checkout>, StoreError>;

    /// Set `return_time` (administrative bookkeeping); transitions at most
    /// once, a second attempt is a conflict.
    async fn mark_returned(&self, id: CheckoutId, at: DateTime<Utc>) -> Result<Checkout, StoreError>;
}
