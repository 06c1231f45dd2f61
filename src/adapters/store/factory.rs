//! Store factory
//!
//! This module provides the factory function that creates the configured
//! store backend.

use crate::adapters::postgres::adapter::PostgresStore;
use crate::adapters::postgres::client::PostgresClient;
use crate::adapters::store::memory::MemoryStore;
use crate::adapters::store::traits::SheetStore;
use crate::config::schema::{StoreBackend, TombolaConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create a store based on the configuration
///
/// This factory function examines the `store.backend` in the configuration
/// and creates the appropriate store implementation.
///
/// # Arguments
///
/// * `config` - The Tombola configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements [`SheetStore`]
///
/// # Errors
///
/// Returns an error if the store cannot be created or reached.
pub async fn create_store(config: &TombolaConfig) -> Result<Arc<dyn SheetStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn SheetStore>)
        }
        StoreBackend::PostgreSQL => {
            let pg_config = config
                .postgresql
                .as_ref()
                .expect("PostgreSQL config should be validated");

            tracing::info!("Creating PostgreSQL store");
            let client = PostgresClient::new(pg_config.clone()).await?;
            client.test_connection().await?;

            Ok(Arc::new(PostgresStore::new(client)) as Arc<dyn SheetStore>)
        }
    }
}
