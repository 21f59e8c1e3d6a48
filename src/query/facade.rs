//! The entry point external callers use.
//!
//! Each query clones a store snapshot up front and runs entirely against
//! it, so concurrent upserts never show up half-applied in a result.

use crate::config::Settings;
use crate::error::{AtlasError, AtlasResult};
use crate::query::EntityFilter;
use crate::storage::{EntityStore, SharedEntityStore};
use crate::types::{EntityEmbedding, EntityId};
use crate::vector::{
    Cluster, ClusterEngine, ClusteringResult, SimilarityRanker, SimilarityResult, validate_finite,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Summary of the store contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub entity_count: usize,
    pub dimension: Option<usize>,
    /// Entity count per type name, sorted by name
    pub by_type: BTreeMap<String, usize>,
}

/// Orchestrates the store, the clustering engine and the ranker.
#[derive(Debug, Clone)]
pub struct QueryFacade {
    store: SharedEntityStore,
    engine: ClusterEngine,
    ranker: SimilarityRanker,
}

impl QueryFacade {
    /// Facade with the single-pass engine and default thresholds.
    pub fn new(store: impl Into<SharedEntityStore>) -> Self {
        Self {
            store: store.into(),
            engine: ClusterEngine::new(),
            ranker: SimilarityRanker::new(),
        }
    }

    /// Facade configured from settings.
    pub fn with_settings(store: impl Into<SharedEntityStore>, settings: &Settings) -> Self {
        Self {
            store: store.into(),
            engine: ClusterEngine::new()
                .with_refinement(settings.clustering.refine_iterations)
                .with_parallel_threshold(settings.clustering.parallel_threshold),
            ranker: SimilarityRanker::new()
                .with_parallel_threshold(settings.similarity.parallel_threshold),
        }
    }

    pub fn with_engine(mut self, engine: ClusterEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_ranker(mut self, ranker: SimilarityRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// The underlying store; all mutation goes through it.
    pub fn store(&self) -> &SharedEntityStore {
        &self.store
    }

    /// Clusters the entities matching `filter` into `k` groups.
    pub fn cluster(&self, filter: &EntityFilter, k: usize) -> AtlasResult<Vec<Cluster>> {
        Ok(self.cluster_with_report(filter, k)?.clusters)
    }

    /// Like [`cluster`](Self::cluster), also reporting how many passes ran.
    pub fn cluster_with_report(
        &self,
        filter: &EntityFilter,
        k: usize,
    ) -> AtlasResult<ClusteringResult> {
        let snapshot = self.store.snapshot();
        let compiled = filter.compile();
        let selected = snapshot.filter(|entity| compiled.matches(entity));

        tracing::debug!(
            total = snapshot.len(),
            selected = selected.len(),
            k,
            "clustering filtered entities"
        );

        Ok(self.engine.cluster(&selected, snapshot.dimension(), k)?)
    }

    /// Ranks the rest of the store by similarity to `entity_id`.
    ///
    /// Always searches the full store; display filters do not narrow it.
    pub fn find_similar(&self, entity_id: &str, top_n: usize) -> AtlasResult<Vec<SimilarityResult>> {
        let started = Instant::now();
        let snapshot = self.store.snapshot();
        let query = snapshot
            .get(entity_id)
            .ok_or_else(|| AtlasError::EntityNotFound {
                id: EntityId::new(entity_id),
            })?;

        let results = self.ranker.rank(query, snapshot.iter(), top_n);

        tracing::debug!(
            entity = entity_id,
            candidates = snapshot.len().saturating_sub(1),
            returned = results.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "similarity ranking complete"
        );

        Ok(results)
    }

    /// Ranks every entity by similarity to an arbitrary vector.
    pub fn search_by_vector(
        &self,
        vector: &[f32],
        top_n: usize,
    ) -> AtlasResult<Vec<SimilarityResult>> {
        let snapshot = self.store.snapshot();
        match snapshot.dimension() {
            Some(dimension) => dimension.validate_vector(vector)?,
            // Nothing stored yet, so nothing can match
            None => return Ok(Vec::new()),
        }
        validate_finite(vector)?;

        Ok(self.ranker.rank_vector(vector, snapshot.iter(), top_n))
    }

    /// Looks up one entity.
    pub fn get(&self, entity_id: &str) -> AtlasResult<EntityEmbedding> {
        self.store
            .get(entity_id)
            .ok_or_else(|| AtlasError::EntityNotFound {
                id: EntityId::new(entity_id),
            })
    }

    /// Inserts or replaces an entity.
    pub fn upsert(&self, entity: EntityEmbedding) -> AtlasResult<Option<EntityEmbedding>> {
        self.store.upsert(entity).map_err(AtlasError::from)
    }

    pub fn remove(&self, entity_id: &str) -> Option<EntityEmbedding> {
        self.store.remove(entity_id)
    }

    /// Replaces the whole store, e.g. after reloading an entity file.
    pub fn reload(&self, store: EntityStore) {
        let previous = self.store.replace(store);
        tracing::info!(
            previous = previous.len(),
            current = self.store.len(),
            "entity store reloaded"
        );
    }

    pub fn stats(&self) -> StoreStats {
        let snapshot = self.store.snapshot();
        let mut by_type = BTreeMap::new();
        for entity in snapshot.iter() {
            *by_type.entry(entity.entity_type.to_string()).or_insert(0) += 1;
        }

        StoreStats {
            entity_count: snapshot.len(),
            dimension: snapshot.dimension().map(|d| d.get()),
            by_type,
        }
    }
}
