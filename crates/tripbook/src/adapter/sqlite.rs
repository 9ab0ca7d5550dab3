use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::migrations;
use super::schema::{SELECT_ENTRY, UPSERT_ENTRY};
use super::PersistenceAdapter;
use crate::error::{Error, Result};

/// Durable adapter backed by a single `SQLite` file.
///
/// Each storage key is one row in the `entries` table. The connection is
/// shared behind a mutex and every query runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAdapter {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against the connection on the blocking pool, reporting any
    /// failure as a storage error for `key`.
    async fn with_conn<T, F>(&self, key: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let outcome = tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| "database connection lock poisoned".to_string())?;
            op(&guard).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| Error::storage(key, format!("storage task failed: {e}")))?;

        outcome.map_err(|message| Error::storage(key, message))
    }
}

#[async_trait::async_trait]
impl PersistenceAdapter for SqliteAdapter {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let owned = key.to_string();
        self.with_conn(key, move |conn| {
            conn.query_row(SELECT_ENTRY, [owned], |row| row.get(0))
                .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let owned_key = key.to_string();
        let owned_value = value.to_string();
        let updated_at = Utc::now().to_rfc3339();
        self.with_conn(key, move |conn| {
            conn.execute(UPSERT_ENTRY, params![owned_key, owned_value, updated_at])
                .map(|_| ())
        })
        .await?;
        debug!(key, bytes = value.len(), "Wrote entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_adapter() -> SqliteAdapter {
        SqliteAdapter::open_in_memory().expect("failed to create test adapter")
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let adapter = create_test_adapter();
        assert!(adapter.get("@packages").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let adapter = create_test_adapter();
        adapter
            .set("@packages", r#"[{"id":"1","name":"Beach","value":199.9}]"#)
            .await
            .unwrap();

        let raw = adapter.get("@packages").await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":"1","name":"Beach","value":199.9}]"#);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_key() {
        let adapter = create_test_adapter();
        adapter.set("@routes", "[1]").await.unwrap();
        adapter.set("@routes", "[]").await.unwrap();

        assert_eq!(adapter.get("@routes").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let adapter = create_test_adapter();
        adapter.set("@routes", "[1]").await.unwrap();
        adapter.set("@reviews", "[2]").await.unwrap();

        assert_eq!(adapter.get("@routes").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(adapter.get("@reviews").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_unicode_value() {
        let adapter = create_test_adapter();
        let value = r#"[{"id":"1","name":"Experiências","city":"São Paulo"}]"#;
        adapter.set("@experiences", value).await.unwrap();

        assert_eq!(
            adapter.get("@experiences").await.unwrap().as_deref(),
            Some(value)
        );
    }

    #[test]
    fn test_path() {
        let adapter = create_test_adapter();
        assert_eq!(adapter.path().to_string_lossy(), ":memory:");
    }

    #[tokio::test]
    async fn test_open_file_based_persists_across_reopen() {
        let db_path =
            std::env::temp_dir().join(format!("tripbook_test_{}.db", std::process::id()));

        {
            let adapter = SqliteAdapter::open(&db_path).unwrap();
            adapter.set("@destinations", "[]").await.unwrap();
            assert_eq!(adapter.path(), db_path);
        }

        let reopened = SqliteAdapter::open(&db_path).unwrap();
        assert_eq!(
            reopened.get("@destinations").await.unwrap().as_deref(),
            Some("[]")
        );

        drop(reopened);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("tripbook_test_{}_dirs", std::process::id()));
        let nested_path = root.join("nested/tripbook.db");
        let _ = std::fs::remove_dir_all(&root);

        let adapter = SqliteAdapter::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(adapter);
        let _ = std::fs::remove_dir_all(&root);
    }
}
