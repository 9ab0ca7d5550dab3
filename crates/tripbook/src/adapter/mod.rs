//! Persistence adapters.
//!
//! A collection is stored as one string value under one string key. The
//! [`PersistenceAdapter`] trait is the only thing the record store knows about
//! durable storage; [`MemoryAdapter`] and [`SqliteAdapter`] implement it.

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::error::Result;

pub use memory::MemoryAdapter;
pub use sqlite::SqliteAdapter;

/// Asynchronous key-value storage for encoded collections.
///
/// Implementations report backend failures as [`crate::Error::Storage`].
#[async_trait::async_trait]
pub trait PersistenceAdapter: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Arc<A> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

/// Open the adapter selected by the configuration.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn open_adapter(config: &Config) -> Result<Arc<dyn PersistenceAdapter>> {
    match config.storage.backend {
        StorageBackend::Sqlite => Ok(Arc::new(SqliteAdapter::open(config.database_path())?)),
        StorageBackend::Memory => {
            info!("Using in-memory storage; records are not kept after exit");
            Ok(Arc::new(MemoryAdapter::new()))
        }
    }
}
