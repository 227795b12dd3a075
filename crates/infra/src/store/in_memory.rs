//! In-memory store for dev/test.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use estoque_core::{CheckoutId, DomainError, Entity, MaterialId};
use estoque_inventory::{Checkout, Material};

use super::{InventoryStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    materials: HashMap<MaterialId, Material>,
    checkouts: HashMap<CheckoutId, Checkout>,
}

/// In-memory inventory store.
///
/// Batch application holds the write lock for the whole validate-and-commit
/// cycle, so concurrent submissions against the same material are serialized.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_material(&self, material: Material) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.materials.entry(*material.id()) {
            Entry::Occupied(_) => {
                Err(DomainError::conflict("material id already registered").into())
            }
            Entry::Vacant(entry) => {
                entry.insert(material);
                Ok(())
            }
        }
    }

    async fn get_material(&self, id: MaterialId) -> Result<Option<Material>, StoreError> {
        let inner = self.read()?;
        Ok(inner.materials.get(&id).cloned())
    }

    async fn list_materials(&self) -> Result<Vec<Material>, StoreError> {
        let inner = self.read()?;
        let mut materials: Vec<Material> = inner.materials.values().cloned().collect();
        materials.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(materials)
    }

    async fn replenish_material(&self, id: MaterialId, amount: i64) -> Result<Material, StoreError> {
        let mut inner = self.write()?;
        let material = inner
            .materials
            .get_mut(&id)
            .ok_or(StoreError::MaterialNotFound(id))?;
        material.replenish(amount)?;
        Ok(material.clone())
    }

    async fn checkout_batch(&self, checkouts: &[Checkout]) -> Result<(), StoreError> {
        let mut inner = self.write()?;

        // Stage every decrement on clones first; the live maps are only
        // touched once the whole batch has passed the floor check.
        let mut staged: HashMap<MaterialId, Material> = HashMap::new();
        for checkout in checkouts {
            let material_id = checkout.material_id();
            let material = match staged.entry(material_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let material = inner
                        .materials
                        .get(&material_id)
                        .cloned()
                        .ok_or(StoreError::MaterialNotFound(material_id))?;
                    entry.insert(material)
                }
            };

            let available = material.available_quantity();
            material.withdraw(checkout.quantity()).map_err(|e| match e {
                DomainError::InvariantViolation(_) => StoreError::InsufficientStock {
                    material_id,
                    requested: checkout.quantity(),
                    available,
                },
                other => StoreError::Domain(other),
            })?;
        }

        for (id, material) in staged {
            inner.materials.insert(id, material);
        }
        for checkout in checkouts {
            inner.checkouts.insert(*checkout.id(), checkout.clone());
        }
        Ok(())
    }

    async fn list_open_checkouts(&self) -> Result<Vec<Checkout>, StoreError> {
        let inner = self.read()?;
        let mut checkouts: Vec<Checkout> = inner
            .checkouts
            .values()
            .filter(|c| c.is_open())
            .cloned()
            .collect();
        checkouts.sort_by_key(|c| c.checkout_time());
        Ok(checkouts)
    }

    async fn list_checkouts(&self) -> Result<Vec<Checkout>, StoreError> {
        let inner = self.read()?;
        let mut checkouts: Vec<Checkout> = inner.checkouts.values().cloned().collect();
        checkouts.sort_by_key(|c| c.checkout_time());
        Ok(checkouts)
    }

    async fn mark_returned(&self, id: CheckoutId, at: DateTime<Utc>) -> Result<Checkout, StoreError> {
        let mut inner = self.write()?;
        let checkout = inner
            .checkouts
            .get_mut(&id)
            .ok_or(StoreError::CheckoutNotFound(id))?;
        checkout.mark_returned(at)?;
        Ok(checkout.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estoque_core::UserId;

    async fn store_with(name: &str, quantity: i64) -> (InMemoryInventoryStore, MaterialId) {
        let store = InMemoryInventoryStore::new();
        let id = MaterialId::new();
        let material = Material::new(id, name, "", quantity, None).unwrap();
        store.insert_material(material).await.unwrap();
        (store, id)
    }

    fn checkout(material_id: MaterialId, quantity: i64) -> Checkout {
        Checkout::new(CheckoutId::new(), UserId::new(), material_id, quantity, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn batch_decrements_and_records() {
        let (store, id) = store_with("Hammer", 10).await;

        store.checkout_batch(&[checkout(id, 3)]).await.unwrap();

        let material = store.get_material(id).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 7);
        assert_eq!(store.list_open_checkouts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn oversell_rejects_the_whole_batch() {
        let (store, id) = store_with("Hammer", 7).await;

        let err = store
            .checkout_batch(&[checkout(id, 5), checkout(id, 5)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock { requested: 5, available: 2, .. }
        ));

        // Nothing committed, not even the first row.
        let material = store.get_material(id).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 7);
        assert!(store.list_open_checkouts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_material_rejects_the_whole_batch() {
        let (store, id) = store_with("Hammer", 10).await;

        let err = store
            .checkout_batch(&[checkout(id, 1), checkout(MaterialId::new(), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MaterialNotFound(_)));

        let material = store.get_material(id).await.unwrap().unwrap();
        assert_eq!(material.available_quantity(), 10);
    }

    #[tokio::test]
    async fn mark_returned_closes_a_checkout_once() {
        let (store, id) = store_with("Hammer", 5).await;
        let c = checkout(id, 2);
        let checkout_id = *c.id();
        store.checkout_batch(&[c]).await.unwrap();

        let returned = store.mark_returned(checkout_id, Utc::now()).await.unwrap();
        assert!(!returned.is_open());
        assert!(store.list_open_checkouts().await.unwrap().is_empty());
        assert_eq!(store.list_checkouts().await.unwrap().len(), 1);

        let err = store.mark_returned(checkout_id, Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let (store, id) = store_with("Hammer", 10).await;

        let dup = Material::new(id, "Hammer (copy)", "", 1, None).unwrap();
        let err = store.insert_material(dup).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));

        // The registered material is untouched.
        let material = store.get_material(id).await.unwrap().unwrap();
        assert_eq!(material.name(), "Hammer");
        assert_eq!(material.available_quantity(), 10);
    }

    #[tokio::test]
    async fn replenish_updates_the_ledger() {
        let (store, id) = store_with("Hammer", 1).await;
        let material = store.replenish_material(id, 9).await.unwrap();
        assert_eq!(material.available_quantity(), 10);

        let err = store.replenish_material(id, 0).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn list_materials_returns_everything() {
        let (store, _) = store_with("Wrench", 4).await;
        let hammer = Material::new(MaterialId::new(), "Hammer", "", 2, None).unwrap();
        store.insert_material(hammer).await.unwrap();

        let names: Vec<String> = store
            .list_materials()
            .await
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["Hammer".to_string(), "Wrench".to_string()]);
    }
}
