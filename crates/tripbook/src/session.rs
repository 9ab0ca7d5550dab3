//! Screens and edit sessions.
//!
//! A [`Screen`] is one record store plus the state of the form in front of it:
//! either nothing is being edited (the next save creates a record) or an
//! [`EditSession`] holds the id being edited and its draft fields (the next
//! save updates that record). [`Planner`] composes the five screens over one
//! shared adapter.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::PersistenceAdapter;
use crate::error::{Error, Result};
use crate::id::{IdGenerator, TimestampIds};
use crate::record::{Fields, Record};
use crate::store::{Collection, RecordStore};

/// A record selected for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Id of the record the next save will update.
    pub editing_id: String,
    /// Field values copied from the record when editing began.
    pub draft: Fields,
}

/// One collection with its create/edit form state.
#[derive(Debug)]
pub struct Screen<R: Record, A: PersistenceAdapter> {
    store: RecordStore<R, A>,
    session: Option<EditSession>,
}

impl<R: Record, A: PersistenceAdapter> Screen<R, A> {
    /// Wrap a store; no edit session is active.
    #[must_use]
    pub fn new(store: RecordStore<R, A>) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Load the store's collection and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be read.
    pub async fn activate(mut store: RecordStore<R, A>) -> Result<Self> {
        store.load().await?;
        Ok(Self::new(store))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<R, A> {
        &self.store
    }

    /// Records currently shown.
    #[must_use]
    pub fn records(&self) -> &Collection<R> {
        self.store.records()
    }

    /// The active edit session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Check if the next save updates an existing record.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Select a record for editing and return its prefilled draft.
    ///
    /// Nothing is persisted. Any previous session is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has `id`.
    pub fn begin_edit(&mut self, id: &str) -> Result<&Fields> {
        let record = self
            .store
            .find_by_id(id)
            .ok_or_else(|| Error::not_found(R::NAME, id))?;

        debug!(collection = R::NAME, id, "Editing record");
        let session = self.session.insert(EditSession {
            editing_id: id.to_string(),
            draft: record.to_fields(),
        });
        Ok(&session.draft)
    }

    /// Leave edit mode without saving, returning the discarded session.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            debug!(collection = R::NAME, id = %session.editing_id, "Edit cancelled");
        }
        session
    }

    /// Save the form: update the record being edited, or create a new one.
    ///
    /// The edit session is cleared only when the save succeeds; after a
    /// validation or storage error the form stays in edit mode.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying create or update returns.
    pub async fn save(&mut self, fields: &Fields) -> Result<R> {
        let record = match &self.session {
            Some(session) => self.store.update(&session.editing_id, fields).await?,
            None => self.store.create(fields).await?,
        };
        self.session = None;
        Ok(record)
    }

    /// Delete a record. An edit session on that record is dropped with it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.editing_id == id)
        {
            self.session = None;
        }
        Ok(removed)
    }
}

/// The five screens of the planner, all backed by one adapter.
#[derive(Debug)]
pub struct Planner<A: PersistenceAdapter + ?Sized> {
    adapter: Arc<A>,
    ids: Arc<dyn IdGenerator>,
}

impl<A: PersistenceAdapter + ?Sized> Planner<A> {
    /// Create a planner using timestamp ids.
    #[must_use]
    pub fn new(adapter: Arc<A>) -> Self {
        Self::with_id_generator(adapter, Arc::new(TimestampIds::new()))
    }

    /// Create a planner with a specific id generator shared by all screens.
    #[must_use]
    pub fn with_id_generator(adapter: Arc<A>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { adapter, ids }
    }

    /// The shared adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    /// Open the screen for one collection, loading it from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter cannot be read.
    pub async fn open<R: Record>(&self) -> Result<Screen<R, Arc<A>>> {
        let store =
            RecordStore::with_id_generator(Arc::clone(&self.adapter), Arc::clone(&self.ids));
        Screen::activate(store).await
    }
}
