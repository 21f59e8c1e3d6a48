//! Entity embedding store with deterministic clustering and cosine similarity search.

pub mod config;
pub mod display;
pub mod error;
pub mod io;
pub mod logging;
pub mod query;
pub mod storage;
pub mod types;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{AtlasError, AtlasResult};
pub use query::{EntityFilter, QueryFacade, StoreStats};
pub use storage::{
    EntitySnapshot, EntityStore, SharedEntityStore, StorageError, StorageResult, load_entities,
    save_entities,
};
pub use types::{CompactString, EntityEmbedding, EntityId, EntityType, Metadata, compact_string};
pub use vector::{
    Cluster, ClusterEngine, ClusterId, ClusteringResult, SimilarityRanker, SimilarityResult,
    VectorDimension, VectorError,
};
