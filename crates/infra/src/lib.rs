//! `estoque-infra` — storage layer and checkout orchestration.

pub mod checkout;
pub mod store;

pub use checkout::{CheckoutError, CheckoutService};
pub use store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError};
