//! In-memory entity store.
//!
//! Records live in insertion order behind `Arc`s. Mutation goes through
//! `Arc::make_mut`, so a snapshot taken before a write keeps seeing the old
//! data while the store moves on.

use crate::types::{EntityEmbedding, EntityId};
use crate::vector::{VectorDimension, VectorError, validate_finite};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable point-in-time view of an [`EntityStore`].
///
/// Cloning is O(1).
#[derive(Debug, Clone, Default)]
pub struct EntitySnapshot {
    entities: Arc<Vec<EntityEmbedding>>,
    positions: Arc<HashMap<EntityId, usize>>,
    dimension: Option<VectorDimension>,
}

impl EntitySnapshot {
    pub fn get(&self, id: &str) -> Option<&EntityEmbedding> {
        self.positions.get(id).map(|&pos| &self.entities[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// All records in store order.
    pub fn all(&self) -> &[EntityEmbedding] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityEmbedding> + '_ {
        self.entities.iter()
    }

    /// Records matching `predicate`, in store order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&EntityEmbedding>
    where
        P: Fn(&EntityEmbedding) -> bool,
    {
        self.entities.iter().filter(|entity| predicate(entity)).collect()
    }

    /// Established dimension, or `None` if no vector has ever been stored.
    pub fn dimension(&self) -> Option<VectorDimension> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// The canonical set of entity embeddings and the sole mutation point.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    current: EntitySnapshot,
}

impl EntityStore {
    /// Creates an empty store; the first upsert fixes the dimension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with a fixed dimension.
    pub fn with_dimension(dimension: VectorDimension) -> Self {
        Self {
            current: EntitySnapshot {
                dimension: Some(dimension),
                ..EntitySnapshot::default()
            },
        }
    }

    /// Builds a store from records, failing on the first invalid one.
    pub fn from_entities(
        entities: impl IntoIterator<Item = EntityEmbedding>,
    ) -> Result<Self, VectorError> {
        let mut store = Self::new();
        for entity in entities {
            store.upsert(entity)?;
        }
        Ok(store)
    }

    /// Inserts or replaces the record for `entity.id`.
    ///
    /// A replaced record keeps its original position. Returns the record it
    /// replaced, if any. On error the store is left untouched.
    pub fn upsert(
        &mut self,
        entity: EntityEmbedding,
    ) -> Result<Option<EntityEmbedding>, VectorError> {
        let dimension = match self.current.dimension {
            Some(dimension) => {
                dimension.validate_vector(&entity.vector)?;
                dimension
            }
            None => VectorDimension::new(entity.vector.len())?,
        };
        validate_finite(&entity.vector)?;

        // Validation is done; nothing below can fail
        self.current.dimension = Some(dimension);

        if let Some(&pos) = self.current.positions.get(entity.id.as_str()) {
            let entities = Arc::make_mut(&mut self.current.entities);
            return Ok(Some(std::mem::replace(&mut entities[pos], entity)));
        }

        let pos = self.current.entities.len();
        Arc::make_mut(&mut self.current.positions).insert(entity.id.clone(), pos);
        Arc::make_mut(&mut self.current.entities).push(entity);
        Ok(None)
    }

    /// Deletes the record for `id`; no-op if absent.
    pub fn remove(&mut self, id: &str) -> Option<EntityEmbedding> {
        let pos = Arc::make_mut(&mut self.current.positions).remove(id)?;
        let removed = Arc::make_mut(&mut self.current.entities).remove(pos);

        // Everything after the hole shifted left by one
        let positions = Arc::make_mut(&mut self.current.positions);
        for entity in &self.current.entities[pos..] {
            if let Some(slot) = positions.get_mut(entity.id.as_str()) {
                *slot -= 1;
            }
        }

        Some(removed)
    }

    /// Removes every record. The established dimension is kept.
    pub fn clear(&mut self) {
        self.current.entities = Arc::default();
        self.current.positions = Arc::default();
    }

    pub fn get(&self, id: &str) -> Option<&EntityEmbedding> {
        self.current.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.current.contains(id)
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[EntityEmbedding] {
        self.current.all()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityEmbedding> + '_ {
        self.current.iter()
    }

    /// Records matching `predicate`, in store order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&EntityEmbedding>
    where
        P: Fn(&EntityEmbedding) -> bool,
    {
        self.current.filter(predicate)
    }

    pub fn dimension(&self) -> Option<VectorDimension> {
        self.current.dimension
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// O(1) immutable view of the current contents.
    pub fn snapshot(&self) -> EntitySnapshot {
        self.current.clone()
    }
}
