//! Batch checkout orchestration.
//!
//! Takes the raw rows a user submitted, validates them as a unit, checks the
//! referenced materials exist and applies the batch through the store. Either
//! every row commits or none do.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use estoque_core::{CheckoutId, DomainError, UserId};
use estoque_inventory::{validate_batch, Checkout, CheckoutRequest, RowError};

use crate::store::{InventoryStore, StoreError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more rows failed validation; nothing was persisted.
    #[error("batch validation failed ({} row error(s))", .0.len())]
    Validation(Vec<RowError>),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn InventoryStore>,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Submit a checkout batch on behalf of `user_id`.
    ///
    /// Blank rows are ignored. Rows referencing a material that does not
    /// exist are reported as row errors alongside any shape errors, so the
    /// caller gets the full picture in one round trip. A batch that passes
    /// validation is applied atomically; insufficient stock on any row
    /// rejects the whole batch.
    pub async fn submit_batch(
        &self,
        user_id: UserId,
        rows: &[CheckoutRequest],
        now: DateTime<Utc>,
    ) -> Result<Vec<Checkout>, CheckoutError> {
        let lines = validate_batch(rows).map_err(CheckoutError::Validation)?;

        let mut row_errors = Vec::new();
        for line in &lines {
            if self.store.get_material(line.material_id).await?.is_none() {
                row_errors.push(RowError::new(line.row, "material", "unknown material"));
            }
        }
        if !row_errors.is_empty() {
            return Err(CheckoutError::Validation(row_errors));
        }

        let checkouts = lines
            .iter()
            .map(|line| {
                Checkout::new(CheckoutId::new(), user_id, line.material_id, line.quantity, now)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.store.checkout_batch(&checkouts).await?;
        tracing::info!(user = %user_id, rows = checkouts.len(), "checkout batch committed");
        Ok(checkouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryInventoryStore;
    use estoque_core::MaterialId;
    use estoque_inventory::Material;

    struct Fixture {
        service: CheckoutService,
        store: Arc<InMemoryInventoryStore>,
    }

    async fn fixture(materials: &[(&str, i64)]) -> (Fixture, Vec<MaterialId>) {
        let store = Arc::new(InMemoryInventoryStore::new());
        let mut ids = Vec::new();
        for (name, quantity) in materials {
            let id = MaterialId::new();
            let material = Material::new(id, *name, "", *quantity, None).unwrap();
            store.insert_material(material).await.unwrap();
            ids.push(id);
        }
        let service = CheckoutService::new(store.clone());
        (Fixture { service, store }, ids)
    }

    fn row(material_id: MaterialId, quantity: i64) -> CheckoutRequest {
        CheckoutRequest {
            material_id: Some(material_id),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn checkout_decrements_stock() {
        let (fx, ids) = fixture(&[("Hammer", 10)]).await;

        let checkouts = fx
            .service
            .submit_batch(UserId::new(), &[row(ids[0], 3)], Utc::now())
            .await
            .unwrap();
        assert_eq!(checkouts.len(), 1);
        assert_eq!(checkouts[0].quantity(), 3);

        let material = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 7);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_with_a_row_error() {
        let (fx, ids) = fixture(&[("Hammer", 10)]).await;

        let err = fx
            .service
            .submit_batch(UserId::new(), &[row(ids[0], 0)], Utc::now())
            .await
            .unwrap_err();
        let CheckoutError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "quantity");

        let material = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 10);
    }

    #[tokio::test]
    async fn unknown_material_is_reported_per_row() {
        let (fx, ids) = fixture(&[("Hammer", 10)]).await;

        let err = fx
            .service
            .submit_batch(
                UserId::new(),
                &[row(ids[0], 1), row(MaterialId::new(), 1)],
                Utc::now(),
            )
            .await
            .unwrap_err();
        let CheckoutError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 1);
        assert_eq!(errors[0].field, "material");

        // The valid row was not persisted either.
        let material = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 10);
        assert!(fx.store.list_open_checkouts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_batches_respect_the_stock_floor() {
        let (fx, ids) = fixture(&[("Hammer", 7)]).await;
        let user = UserId::new();

        fx.service
            .submit_batch(user, &[row(ids[0], 5)], Utc::now())
            .await
            .unwrap();

        let err = fx
            .service
            .submit_batch(user, &[row(ids[0], 5)], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Store(StoreError::InsufficientStock { requested: 5, available: 2, .. })
        ));

        let material = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 2);
        assert_eq!(fx.store.list_open_checkouts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_rows_are_skipped() {
        let (fx, ids) = fixture(&[("Hammer", 10)]).await;

        let blank = CheckoutRequest {
            material_id: None,
            quantity: None,
        };
        let checkouts = fx
            .service
            .submit_batch(UserId::new(), &[blank.clone(), row(ids[0], 2), blank], Utc::now())
            .await
            .unwrap();
        assert_eq!(checkouts.len(), 1);

        let material = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 8);
    }

    #[tokio::test]
    async fn empty_batch_commits_nothing() {
        let (fx, _) = fixture(&[("Hammer", 10)]).await;

        let checkouts = fx
            .service
            .submit_batch(UserId::new(), &[], Utc::now())
            .await
            .unwrap();
        assert!(checkouts.is_empty());
        assert!(fx.store.list_open_checkouts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multi_material_batch_commits_together() {
        let (fx, ids) = fixture(&[("Hammer", 5), ("Wrench", 3)]).await;

        fx.service
            .submit_batch(UserId::new(), &[row(ids[0], 2), row(ids[1], 1)], Utc::now())
            .await
            .unwrap();

        let hammer = fx.store.get_material(ids[0]).await.unwrap().unwrap();
        let wrench = fx.store.get_material(ids[1]).await.unwrap().unwrap();
        assert_eq!(hammer.available_quantity(), 3);
        assert_eq!(wrench.available_quantity(), 2);
        assert_eq!(fx.store.list_open_checkouts().await.unwrap().len(), 2);
    }
}
