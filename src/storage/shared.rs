//! Thread-safe wrapper for [`EntityStore`].
//!
//! Single writer, many readers. Readers hold the lock only long enough to
//! clone a snapshot, so long-running queries never block writers.

use crate::storage::{EntitySnapshot, EntityStore};
use crate::types::EntityEmbedding;
use crate::vector::{VectorDimension, VectorError};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to an entity store. Clones point at the same store.
#[derive(Clone, Default)]
pub struct SharedEntityStore {
    inner: Arc<RwLock<EntityStore>>,
}

impl SharedEntityStore {
    pub fn new(store: EntityStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Inserts or replaces a record with exclusive access.
    pub fn upsert(&self, entity: EntityEmbedding) -> Result<Option<EntityEmbedding>, VectorError> {
        self.inner.write().upsert(entity)
    }

    /// Applies a batch of upserts atomically: either every record is
    /// stored or, on the first invalid one, none are.
    pub fn upsert_batch(
        &self,
        entities: impl IntoIterator<Item = EntityEmbedding>,
    ) -> Result<usize, VectorError> {
        let mut guard = self.inner.write();
        let mut staged = guard.clone();
        let mut count = 0;
        for entity in entities {
            staged.upsert(entity)?;
            count += 1;
        }
        *guard = staged;
        Ok(count)
    }

    pub fn remove(&self, id: &str) -> Option<EntityEmbedding> {
        self.inner.write().remove(id)
    }

    /// Swaps in a whole new store, e.g. after reloading from disk.
    pub fn replace(&self, store: EntityStore) -> EntityStore {
        std::mem::replace(&mut *self.inner.write(), store)
    }

    /// Point-in-time view for a single query.
    #[must_use]
    pub fn snapshot(&self) -> EntitySnapshot {
        self.inner.read().snapshot()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<EntityEmbedding> {
        self.inner.read().get(id).cloned()
    }

    pub fn dimension(&self) -> Option<VectorDimension> {
        self.inner.read().dimension()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl From<EntityStore> for SharedEntityStore {
    fn from(store: EntityStore) -> Self {
        Self::new(store)
    }
}

impl std::fmt::Debug for SharedEntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Try to acquire read lock for debug output
        match self.inner.try_read() {
            Some(store) => write!(f, "SharedEntityStore {{ entities: {} }}", store.len()),
            None => write!(f, "SharedEntityStore {{ <locked> }}"),
        }
    }
}
