//! Inventory domain module.
//!
//! This crate contains business rules for materials and checkouts,
//! implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod batch;
pub mod checkout;
pub mod material;

pub use batch::{validate_batch, CheckoutLine, CheckoutRequest, RowError};
pub use checkout::Checkout;
pub use material::Material;
