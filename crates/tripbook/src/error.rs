//! Error types for tripbook.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! separates problems the user can fix (validation, unknown ids) from problems
//! in the storage underneath.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tripbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// Input fields were rejected before any mutation was attempted.
    #[error("invalid {collection}: {}", .problems.join("; "))]
    Validation {
        /// Collection the input was meant for.
        collection: &'static str,
        /// One entry per rejected field.
        problems: Vec<String>,
    },

    /// No record with the given id exists in the collection.
    #[error("no record with id '{id}' in {collection}")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// The id that was looked up.
        id: String,
    },

    // === Persistence Errors ===
    /// The persistence adapter failed to read or write a key.
    #[error("storage error for key '{key}': {message}")]
    Storage {
        /// Storage key involved in the failed operation.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A stored value could not be decoded as a collection.
    #[error("stored value at '{key}' is not a valid collection: {source}")]
    Decode {
        /// Storage key holding the malformed value.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for tripbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a storage error for the given key.
    #[must_use]
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error rejected user input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error reports an unknown id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the storage layer.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. }
                | Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::DatabaseMigration { .. }
        )
    }
}
