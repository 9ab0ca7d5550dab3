//! `tripbook` - Local records for planning a trip
//!
//! Five independent collections (destinations, packages, routes, experiences
//! and reviews) are each stored as one JSON document under a fixed key in a
//! pluggable key-value adapter. Every mutation writes the whole collection
//! back before the in-memory copy changes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod id;
pub mod logging;
pub mod record;
pub mod session;
pub mod store;

pub use adapter::{open_adapter, MemoryAdapter, PersistenceAdapter, SqliteAdapter};
pub use config::Config;
pub use error::{Error, Result};
pub use id::{IdGenerator, SequentialIds, TimestampIds};
pub use logging::init_logging;
pub use record::{
    Destination, Experience, ExperienceKind, Fields, Package, Record, Review, Route,
};
pub use session::{EditSession, Planner, Screen};
pub use store::{Collection, LoadState, RecordStore};
