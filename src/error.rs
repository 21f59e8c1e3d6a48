//! Error types for the entity atlas.
//!
//! Module-level errors (`VectorError`, `ClusteringError`, `StorageError`)
//! fold into `AtlasError`, the type every `QueryFacade` operation returns.
//! All of these are caller errors; nothing here is transient or retried.

use crate::storage::StorageError;
use crate::types::EntityId;
use crate::vector::{ClusteringError, VectorError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for atlas operations
#[derive(Error, Debug)]
pub enum AtlasError {
    /// A vector disagrees with the store's established dimensionality
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}. All embeddings in a store must come from the same model."
    )]
    DimensionMismatch { expected: usize, actual: usize },

    /// A vector that can never be stored (zero-length, NaN, infinite)
    #[error("Invalid vector: {0}")]
    InvalidVector(VectorError),

    #[error("Invalid cluster count {k}: at least one cluster is required")]
    InvalidClusterCount { k: usize },

    #[error("Cluster count {k} is above the limit of {max}")]
    TooManyClusters { k: usize, max: usize },

    #[error("Entity '{id}' not found. Check the id or reload the entity file.")]
    EntityNotFound { id: EntityId },

    /// Persistence errors
    #[error("Failed to load entities from '{path}': {source}")]
    Load { path: PathBuf, source: StorageError },

    #[error("Failed to save entities to '{path}': {source}")]
    Save { path: PathBuf, source: StorageError },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl AtlasError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::InvalidVector(_) => "INVALID_VECTOR",
            Self::InvalidClusterCount { .. } => "INVALID_CLUSTER_COUNT",
            Self::TooManyClusters { .. } => "TOO_MANY_CLUSTERS",
            Self::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Self::Load { .. } => "LOAD_ERROR",
            Self::Save { .. } => "SAVE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::DimensionMismatch { .. } => vec![
                "Re-embed the entity with the same model as the rest of the store",
                "Start a new entity file if the embedding model changed",
            ],
            Self::InvalidVector(_) => {
                vec!["Check the upstream embedding producer for empty or NaN output"]
            }
            Self::InvalidClusterCount { .. } => vec!["Pass -k with a value of 1 or more"],
            Self::TooManyClusters { .. } => vec![
                "Pass a smaller -k",
                "Narrow the input with --type or --name instead of adding clusters",
            ],
            Self::EntityNotFound { .. } => vec![
                "Run 'entity-atlas stats' to confirm the entity file that was loaded",
                "Entity ids are case-sensitive",
            ],
            Self::Load { .. } => vec![
                "Check that the file exists and contains a JSON entity document",
                "Use --input to point at a different entity file",
            ],
            Self::Save { .. } => vec!["Check disk space and permissions for the target directory"],
            Self::Config { .. } => vec![
                "Run 'entity-atlas config' to inspect the effective settings",
                "Run 'entity-atlas init --force' to regenerate the settings file",
            ],
        }
    }
}

impl From<VectorError> for AtlasError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            other => Self::InvalidVector(other),
        }
    }
}

impl From<ClusteringError> for AtlasError {
    fn from(err: ClusteringError) -> Self {
        match err {
            ClusteringError::InvalidClusterCount(k) => Self::InvalidClusterCount { k },
            ClusteringError::TooManyClusters { k, max } => Self::TooManyClusters { k, max },
        }
    }
}

/// Result type alias for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;
