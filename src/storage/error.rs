use crate::types::EntityId;
use crate::vector::VectorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported entity file version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("Entity '{id}' rejected: {source}")]
    InvalidRecord {
        id: EntityId,
        #[source]
        source: VectorError,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
