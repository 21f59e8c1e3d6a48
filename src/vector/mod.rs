//! Vector math, clustering and similarity ranking for entity embeddings.
//!
//! # Architecture
//! Everything here works on borrowed snapshots of the entity store and never
//! mutates it. Clustering partitions a (possibly filtered) entity set around
//! deterministic seeds; ranking scores every candidate by cosine similarity.
//! Both are brute force: O(n * k * d) and O(n * d) respectively.

mod clustering;
pub mod math;
mod similarity;
mod types;

// Re-export core types for public API
pub use clustering::{
    Cluster, ClusterEngine, ClusteringError, ClusteringResult, MAX_CLUSTERS,
    assign_to_nearest_centroid,
};
pub use math::{cosine_similarity, dot, magnitude, mean_vector, squared_distance};
pub use similarity::{SimilarityRanker, SimilarityResult};
pub use types::{ClusterId, VectorDimension, VectorError, validate_finite};
