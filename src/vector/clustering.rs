//! Nearest-centroid clustering of entity embeddings.
//!
//! This module partitions a set of entities into `k` groups by squared
//! Euclidean distance to a set of centroids.
//!
//! # Algorithm Details
//! - Seeding: the first `k` entities in input order (deterministic, no RNG)
//! - Assignment: nearest centroid, ties go to the lowest cluster id
//! - Baseline: a single assignment pass; returned centroids are the seeds
//! - Optional refinement: up to `refine_iterations` extra Lloyd passes
//!   (recompute means, reassign) that stop once assignments settle
//!
//! # Performance Characteristics
//! - O(n * k * d) per assignment pass
//! - Assignment fans out over rayon above `parallel_threshold` entities

use crate::types::{EntityEmbedding, EntityId};
use crate::vector::math::{mean_vector, squared_distance};
use crate::vector::types::{ClusterId, VectorDimension};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Inputs at or above this size are assigned in parallel by default.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Largest `k` a single call accepts. Every slot is materialized, so this
/// bounds the allocation as well as the `ClusterId` range.
pub const MAX_CLUSTERS: usize = 1 << 16;

/// One group of a partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Slot index in `[0, k)`.
    pub cluster_id: ClusterId,

    /// Seed vector for the baseline pass; member mean after refinement.
    pub centroid: Vec<f32>,

    /// Assigned entities, in input order.
    pub members: Vec<EntityId>,
}

impl Cluster {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult {
    /// Exactly `k` clusters, ordered by cluster id.
    pub clusters: Vec<Cluster>,

    /// Number of assignment passes performed (1 for the baseline).
    pub passes: usize,
}

/// Errors that can occur during clustering operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusteringError {
    #[error("Invalid cluster count: {0}\nSuggestion: Use k >= 1")]
    InvalidClusterCount(usize),

    #[error("Too many clusters: {k} exceeds the limit of {max}\nSuggestion: Use a smaller k")]
    TooManyClusters { k: usize, max: usize },
}

/// Partitions entities into `k` clusters.
///
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterEngine {
    refine_iterations: usize,
    parallel_threshold: usize,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterEngine {
    /// Single-pass engine (no refinement).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            refine_iterations: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Allows up to `iterations` Lloyd refinement passes after the first.
    #[must_use]
    pub const fn with_refinement(mut self, iterations: usize) -> Self {
        self.refine_iterations = iterations;
        self
    }

    /// Sets the input size at which assignment switches to rayon.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn refine_iterations(&self) -> usize {
        self.refine_iterations
    }

    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Clusters `entities` into `k` groups.
    ///
    /// # Arguments
    /// * `entities` - Input set, all of the same dimension; order decides seeding
    /// * `dimension` - Store dimension, used for the zero centroids of unseeded
    ///   slots. `None` when the store has never held a vector.
    /// * `k` - Number of clusters, in `1..=MAX_CLUSTERS`
    ///
    /// # Returns
    /// Exactly `k` clusters. If `k` exceeds the number of entities, the
    /// surplus slots are empty and carry zero-vector centroids.
    #[must_use = "clustering results should be used or the computation is wasted"]
    pub fn cluster(
        &self,
        entities: &[&EntityEmbedding],
        dimension: Option<VectorDimension>,
        k: usize,
    ) -> Result<ClusteringResult, ClusteringError> {
        if k == 0 {
            return Err(ClusteringError::InvalidClusterCount(k));
        }
        let slot_count = match u32::try_from(k) {
            Ok(slots) if k <= MAX_CLUSTERS => slots,
            _ => {
                return Err(ClusteringError::TooManyClusters {
                    k,
                    max: MAX_CLUSTERS,
                });
            }
        };

        let started = Instant::now();
        let dimension = dimension
            .map(|d| d.get())
            .or_else(|| entities.first().map(|e| e.dimension()))
            .unwrap_or(0);

        // Only the first min(k, n) slots get seeds; the rest never win a member
        let seeded = k.min(entities.len());
        let mut centroids: Vec<Vec<f32>> = entities[..seeded]
            .iter()
            .map(|entity| entity.vector.clone())
            .collect();

        let mut assignments = self.assign(entities, &centroids);
        let mut passes = 1;

        for _ in 0..self.refine_iterations {
            centroids = update_centroids(entities, &assignments, &centroids, dimension);
            let reassigned = self.assign(entities, &centroids);
            passes += 1;

            let converged = reassigned == assignments;
            assignments = reassigned;
            if converged {
                break;
            }
        }

        let mut clusters: Vec<Cluster> = (0..slot_count)
            .map(ClusterId::new)
            .map(|cluster_id| Cluster {
                cluster_id,
                centroid: centroids
                    .get(cluster_id.index())
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; dimension]),
                members: Vec::new(),
            })
            .collect();

        for (entity, cluster_id) in entities.iter().zip(&assignments) {
            clusters[cluster_id.index()].members.push(entity.id.clone());
        }

        tracing::debug!(
            entities = entities.len(),
            k,
            passes,
            elapsed_us = started.elapsed().as_micros() as u64,
            "clustering complete"
        );

        Ok(ClusteringResult { clusters, passes })
    }

    /// One assignment pass over all entities.
    fn assign(&self, entities: &[&EntityEmbedding], centroids: &[Vec<f32>]) -> Vec<ClusterId> {
        let centroid_refs: Vec<&[f32]> = centroids.iter().map(Vec::as_slice).collect();

        if entities.len() >= self.parallel_threshold {
            entities
                .par_iter()
                .map(|entity| assign_to_nearest_centroid(&entity.vector, &centroid_refs))
                .collect()
        } else {
            entities
                .iter()
                .map(|entity| assign_to_nearest_centroid(&entity.vector, &centroid_refs))
                .collect()
        }
    }
}

/// Assigns a vector to the nearest centroid by squared Euclidean distance.
///
/// Ties go to the lowest cluster id. `centroids` must be non-empty.
pub fn assign_to_nearest_centroid(vector: &[f32], centroids: &[&[f32]]) -> ClusterId {
    let mut best_distance = f64::INFINITY;
    let mut best_cluster = 0u32;

    // Callers pass at most MAX_CLUSTERS centroids, well inside u32
    for (i, centroid) in (0u32..).zip(centroids) {
        let distance = squared_distance(vector, centroid);
        // Strict comparison keeps the earliest slot on ties
        if distance < best_distance {
            best_distance = distance;
            best_cluster = i;
        }
    }

    ClusterId::new(best_cluster)
}

/// Recomputes centroids as the mean of their members.
///
/// Empty clusters keep their previous centroid.
fn update_centroids(
    entities: &[&EntityEmbedding],
    assignments: &[ClusterId],
    previous: &[Vec<f32>],
    dimension: usize,
) -> Vec<Vec<f32>> {
    previous
        .iter()
        .enumerate()
        .map(|(slot, old)| {
            let members = entities
                .iter()
                .zip(assignments)
                .filter(|(_, cluster_id)| cluster_id.index() == slot)
                .map(|(entity, _)| entity.vector.as_slice());

            mean_vector(members, dimension).unwrap_or_else(|| old.clone())
        })
        .collect()
}
