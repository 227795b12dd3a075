use std::sync::Arc;

use estoque_infra::{
    CheckoutService, InMemoryInventoryStore, InventoryStore, PostgresInventoryStore,
};

/// Application-level service container shared across handlers.
pub struct AppServices {
    pub store: Arc<dyn InventoryStore>,
    pub checkouts: CheckoutService,
}

/// Wire up the storage layer and the services on top of it.
///
/// Defaults to the in-memory store; set `USE_PERSISTENT_STORE=1` together
/// with `DATABASE_URL` to run against Postgres.
pub async fn build_services() -> AppServices {
    let store = build_store().await;
    let checkouts = CheckoutService::new(store.clone());
    AppServices { store, checkouts }
}

async fn build_store() -> Arc<dyn InventoryStore> {
    let use_persistent = std::env::var("USE_PERSISTENT_STORE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if use_persistent {
        let url = std::env::var("DATABASE_URL")
            .expect("USE_PERSISTENT_STORE=1 requires DATABASE_URL");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(8)
            .connect(&url)
            .await
            .expect("failed to connect to Postgres");
        tracing::info!("using Postgres inventory store");
        Arc::new(PostgresInventoryStore::new(pool))
    } else {
        tracing::info!("using in-memory inventory store");
        Arc::new(InMemoryInventoryStore::new())
    }
}
