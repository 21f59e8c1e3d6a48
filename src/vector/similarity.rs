//! Brute-force cosine ranking over a store snapshot.
//!
//! Every candidate is scored, so a query is O(n * d). Results are sorted
//! with a stable sort, which keeps candidates with equal scores in input
//! order and makes output reproducible.

use crate::types::{EntityEmbedding, EntityId};
use crate::vector::math::cosine_similarity;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Candidate sets at or above this size are scored in parallel by default.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// A scored candidate from a single ranking query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub entity_id: EntityId,
    pub similarity_score: f32,
}

/// Ranks entities by cosine similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityRanker {
    parallel_threshold: usize,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityRanker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Sets the candidate count at which scoring switches to rayon.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Ranks every entity other than `query` by similarity to it.
    ///
    /// The query is excluded by id. Returns at most `top_n` results in
    /// descending score order; an empty candidate set yields an empty list.
    #[must_use]
    pub fn rank<'a, I>(
        &self,
        query: &EntityEmbedding,
        entities: I,
        top_n: usize,
    ) -> Vec<SimilarityResult>
    where
        I: IntoIterator<Item = &'a EntityEmbedding>,
    {
        let candidates: Vec<&EntityEmbedding> = entities
            .into_iter()
            .filter(|candidate| candidate.id != query.id)
            .collect();

        self.score_and_truncate(&query.vector, &candidates, top_n)
    }

    /// Ranks every entity by similarity to an arbitrary vector.
    ///
    /// Callers must have checked that `vector` matches the entities' dimension.
    #[must_use]
    pub fn rank_vector<'a, I>(&self, vector: &[f32], entities: I, top_n: usize) -> Vec<SimilarityResult>
    where
        I: IntoIterator<Item = &'a EntityEmbedding>,
    {
        let candidates: Vec<&EntityEmbedding> = entities.into_iter().collect();
        self.score_and_truncate(vector, &candidates, top_n)
    }

    fn score_and_truncate(
        &self,
        query: &[f32],
        candidates: &[&EntityEmbedding],
        top_n: usize,
    ) -> Vec<SimilarityResult> {
        if top_n == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let score = |candidate: &&EntityEmbedding| SimilarityResult {
            entity_id: candidate.id.clone(),
            similarity_score: cosine_similarity(query, &candidate.vector),
        };

        let mut results: Vec<SimilarityResult> = if candidates.len() >= self.parallel_threshold {
            candidates.par_iter().map(score).collect()
        } else {
            candidates.iter().map(score).collect()
        };

        // sort_by is stable: equal scores keep input order
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(top_n);
        results
    }
}
