//! Postgres-backed inventory store.
//!
//! Schema lives in `migrations/` at the repository root (`materiais` and
//! `retiradas` tables).
//!
//! ## Concurrency
//!
//! The stock floor is enforced by the database itself: every decrement is a
//! single conditional `UPDATE ... WHERE quantidade_disponivel >= $n`, so two
//! racing submissions against the same material cannot overdraw the ledger.
//! A whole batch runs inside one transaction; any failing row aborts it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use estoque_core::{CheckoutId, DomainError, Entity, MaterialId, UserId};
use estoque_inventory::{Checkout, Material};

use super::{InventoryStore, StoreError};

pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn material_from_row(row: &PgRow) -> Result<Material, StoreError> {
    Ok(Material::from_parts(
        MaterialId::from_uuid(row.try_get("id")?),
        row.try_get("nome")?,
        row.try_get("descricao")?,
        row.try_get("quantidade_disponivel")?,
        row.try_get("imagem")?,
    ))
}

fn checkout_from_row(row: &PgRow) -> Result<Checkout, StoreError> {
    Ok(Checkout::from_parts(
        CheckoutId::from_uuid(row.try_get("id")?),
        UserId::from_uuid(row.try_get("usuario_id")?),
        MaterialId::from_uuid(row.try_get("material_id")?),
        row.try_get("quantidade")?,
        row.try_get("data_retirada")?,
        row.try_get("data_devolucao")?,
    ))
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn insert_material(&self, material: Material) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO materiais (id, nome, descricao, quantidade_disponivel, imagem)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*material.id().as_uuid())
        .bind(material.name())
        .bind(material.description())
        .bind(material.available_quantity())
        .bind(material.image())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_material(&self, id: MaterialId) -> Result<Option<Material>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, nome, descricao, quantidade_disponivel, imagem
            FROM materiais
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(material_from_row).transpose()
    }

    async fn list_materials(&self) -> Result<Vec<Material>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, nome, descricao, quantidade_disponivel, imagem
            FROM materiais
            ORDER BY nome
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(material_from_row).collect()
    }

    async fn replenish_material(&self, id: MaterialId, amount: i64) -> Result<Material, StoreError> {
        if amount <= 0 {
            return Err(DomainError::validation("amount must be a positive integer").into());
        }

        let row = sqlx::query(
            r#"
            UPDATE materiais
            SET quantidade_disponivel = quantidade_disponivel + $2
            WHERE id = $1
            RETURNING id, nome, descricao, quantidade_disponivel, imagem
            "#,
        )
        .bind(*id.as_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => material_from_row(&row),
            None => Err(StoreError::MaterialNotFound(id)),
        }
    }

    async fn checkout_batch(&self, checkouts: &[Checkout]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for checkout in checkouts {
            let updated = sqlx::query(
                r#"
                UPDATE materiais
                SET quantidade_disponivel = quantidade_disponivel - $2
                WHERE id = $1 AND quantidade_disponivel >= $2
                "#,
            )
            .bind(*checkout.material_id().as_uuid())
            .bind(checkout.quantity())
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Distinguish a missing material from an oversell attempt;
                // returning drops the transaction and rolls everything back.
                let row = sqlx::query(
                    "SELECT quantidade_disponivel FROM materiais WHERE id = $1",
                )
                .bind(*checkout.material_id().as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match row {
                    Some(row) => StoreError::InsufficientStock {
                        material_id: checkout.material_id(),
                        requested: checkout.quantity(),
                        available: row.try_get("quantidade_disponivel")?,
                    },
                    None => StoreError::MaterialNotFound(checkout.material_id()),
                });
            }

            sqlx::query(
                r#"
                INSERT INTO retiradas
                    (id, usuario_id, material_id, quantidade, data_retirada, data_devolucao)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(*checkout.id().as_uuid())
            .bind(*checkout.user_id().as_uuid())
            .bind(*checkout.material_id().as_uuid())
            .bind(checkout.quantity())
            .bind(checkout.checkout_time())
            .bind(checkout.return_time())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_open_checkouts(&self) -> Result<Vec<Checkout>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, usuario_id, material_id, quantidade, data_retirada, data_devolucao
            FROM retiradas
            WHERE data_devolucao IS NULL
            ORDER BY data_retirada
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(checkout_from_row).collect()
    }

    async fn list_checkouts(&self) -> Result<Vec<Checkout>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, usuario_id, material_id, quantidade, data_retirada, data_devolucao
            FROM retiradas
            ORDER BY data_retirada
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(checkout_from_row).collect()
    }

    async fn mark_returned(&self, id: CheckoutId, at: DateTime<Utc>) -> Result<Checkout, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE retiradas
            SET data_devolucao = $2
            WHERE id = $1 AND data_devolucao IS NULL
            RETURNING id, usuario_id, material_id, quantidade, data_retirada, data_devolucao
            "#,
        )
        .bind(*id.as_uuid())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return checkout_from_row(&row);
        }

        // No transition happened: either the checkout does not exist or it
        // was already returned.
        let exists = sqlx::query("SELECT 1 AS one FROM retiradas WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if exists {
            Err(DomainError::conflict("checkout already returned").into())
        } else {
            Err(StoreError::CheckoutNotFound(id))
        }
    }
}
