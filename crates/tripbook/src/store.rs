//! The record store.
//!
//! A [`RecordStore`] keeps one collection in memory and mirrors it to a
//! [`PersistenceAdapter`] under the schema's storage key. The whole collection
//! is written on every mutation. The next collection is built aside and
//! only replaces the in-memory one after the write succeeds, so a failed write
//! leaves both memory and storage as they were.
//!
//! Stores are not safe against two writers on the same key: two stores bound
//! to one key will overwrite each other's changes (last writer wins).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapter::PersistenceAdapter;
use crate::error::{Error, Result};
use crate::id::{IdGenerator, TimestampIds};
use crate::record::{EditMode, Fields, Record};

/// Attempts at drawing an id that is not already in the collection.
const MAX_ID_ATTEMPTS: usize = 64;

/// An ordered set of records of one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with the given id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Index of the record with the given id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Check if a record with the given id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Iterate over records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the collection, returning its records.
    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        self.records
    }
}

impl<R> From<Vec<R>> for Collection<R> {
    fn from(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// What the last load found under the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing has been loaded yet.
    #[default]
    Unloaded,
    /// The key has never been written.
    Missing,
    /// The stored value decoded cleanly, or a write has since succeeded.
    Loaded,
    /// The stored value could not be decoded. The collection reads as empty
    /// and `raw` stays in storage until the next successful write.
    Malformed {
        /// The value found in storage.
        raw: String,
    },
}

/// Encode records in the stored format: a JSON array of flat objects.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn encode<R: Record>(records: &[R]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decode a stored value into records.
///
/// # Errors
///
/// Returns [`Error::Decode`] if `raw` is not a JSON array of records.
pub fn decode<R: Record>(raw: &str) -> Result<Vec<R>> {
    serde_json::from_str(raw).map_err(|source| Error::Decode {
        key: R::KEY.to_string(),
        source,
    })
}

/// Generic CRUD engine for one collection.
#[derive(Debug)]
pub struct RecordStore<R: Record, A: PersistenceAdapter> {
    adapter: A,
    ids: Arc<dyn IdGenerator>,
    collection: Collection<R>,
    state: LoadState,
}

impl<R: Record, A: PersistenceAdapter> RecordStore<R, A> {
    /// Create an unloaded store using timestamp ids.
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self::with_id_generator(adapter, Arc::new(TimestampIds::new()))
    }

    /// Create an unloaded store using the given id generator.
    #[must_use]
    pub fn with_id_generator(adapter: A, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            adapter,
            ids,
            collection: Collection::new(),
            state: LoadState::Unloaded,
        }
    }

    /// Create a store and load its collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be read.
    pub async fn open(adapter: A) -> Result<Self> {
        let mut store = Self::new(adapter);
        store.load().await?;
        Ok(store)
    }

    /// Read the collection from storage, replacing the in-memory copy.
    ///
    /// A missing key loads as empty. A value that fails to decode also loads
    /// as empty; it is logged and reported through [`Self::load_state`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the adapter itself fails.
    pub async fn load(&mut self) -> Result<&Collection<R>> {
        let (records, state) = match self.adapter.get(R::KEY).await? {
            None => (Vec::new(), LoadState::Missing),
            Some(raw) => match decode::<R>(&raw) {
                Ok(records) => (records, LoadState::Loaded),
                Err(err) => {
                    warn!(
                        key = R::KEY,
                        error = %err,
                        "Stored collection is malformed, reading it as empty"
                    );
                    (Vec::new(), LoadState::Malformed { raw })
                }
            },
        };

        debug!(key = R::KEY, count = records.len(), "Loaded collection");
        self.collection = Collection::from(records);
        self.state = state;
        Ok(&self.collection)
    }

    /// The in-memory collection.
    #[must_use]
    pub fn records(&self) -> &Collection<R> {
        &self.collection
    }

    /// Outcome of the last load.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Look up a record by id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&R> {
        self.collection.find(id)
    }

    /// Validate `fields`, append a new record and persist.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is changed, or a storage
    /// error if the write fails (the collection is left as it was).
    pub async fn create(&mut self, fields: &Fields) -> Result<R> {
        self.ensure_loaded().await?;
        let record = R::from_fields(self.fresh_id()?, fields)?;

        let mut next = self.collection.as_slice().to_vec();
        next.push(record.clone());
        self.commit(next).await?;

        info!(collection = R::NAME, id = record.id(), "Created record");
        Ok(record)
    }

    /// Validate `fields` and replace the record with the given id.
    ///
    /// For [`EditMode::InPlace`] schemas the record keeps its id and position.
    /// For [`EditMode::Recreate`] schemas the old record is removed and the
    /// replacement is appended under a new id, in a single write.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`Error::NotFound`] if no record has `id`,
    /// or a storage error if the write fails.
    pub async fn update(&mut self, id: &str, fields: &Fields) -> Result<R> {
        self.ensure_loaded().await?;
        let new_id = match R::EDIT_MODE {
            EditMode::InPlace => id.to_string(),
            EditMode::Recreate => self.fresh_id()?,
        };
        let record = R::from_fields(new_id, fields)?;
        let pos = self
            .collection
            .position(id)
            .ok_or_else(|| Error::not_found(R::NAME, id))?;

        let mut next = self.collection.as_slice().to_vec();
        match R::EDIT_MODE {
            EditMode::InPlace => next[pos] = record.clone(),
            EditMode::Recreate => {
                next.remove(pos);
                next.push(record.clone());
            }
        }
        self.commit(next).await?;

        info!(collection = R::NAME, id, new_id = record.id(), "Updated record");
        Ok(record)
    }

    /// Remove the record with the given id.
    ///
    /// Returns `false` without writing anything if no record has `id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        self.ensure_loaded().await?;
        let Some(pos) = self.collection.position(id) else {
            debug!(collection = R::NAME, id, "Delete of unknown id ignored");
            return Ok(false);
        };

        let mut next = self.collection.as_slice().to_vec();
        next.remove(pos);
        self.commit(next).await?;

        info!(collection = R::NAME, id, "Deleted record");
        Ok(true)
    }

    /// Mutations never run against a collection that was not read first;
    /// otherwise the write would replace whatever is stored.
    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.state == LoadState::Unloaded {
            self.load().await?;
        }
        Ok(())
    }

    fn fresh_id(&self) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.collection.contains(&id) {
                return Ok(id);
            }
        }
        Err(Error::internal(format!(
            "id generator produced {MAX_ID_ATTEMPTS} ids already present in {}",
            R::NAME
        )))
    }

    async fn commit(&mut self, next: Vec<R>) -> Result<()> {
        let encoded = encode(&next)?;
        if let Err(err) = self.adapter.set(R::KEY, &encoded).await {
            warn!(key = R::KEY, error = %err, "Write failed, collection left unchanged");
            return Err(err);
        }

        debug!(key = R::KEY, count = next.len(), "Committed collection");
        self.collection = Collection::from(next);
        self.state = LoadState::Loaded;
        Ok(())
    }
}
