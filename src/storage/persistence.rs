//! JSON persistence for entity sets.
//!
//! The core never touches disk; this is the loader the CLI uses to populate
//! a store. Files are either a versioned document
//! `{ "version": 1, "dimension": 3, "entities": [...] }` or a bare array of
//! entity records.

use crate::storage::{EntitySnapshot, EntityStore, StorageError, StorageResult};
use crate::types::EntityEmbedding;
use crate::vector::VectorDimension;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Versioned on-disk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityFile {
    /// Version of the file format
    pub version: u32,

    /// Dimension every vector must have; inferred from the first record when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<VectorDimension>,

    pub entities: Vec<EntityEmbedding>,
}

impl EntityFile {
    /// Current file format version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_snapshot(snapshot: &EntitySnapshot) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            dimension: snapshot.dimension(),
            entities: snapshot.all().to_vec(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntityDocument {
    Versioned(EntityFile),
    Bare(Vec<EntityEmbedding>),
}

/// Parses an entity document and builds a store from it.
///
/// Records are applied in file order: a duplicate id replaces the earlier
/// record, and the first invalid record aborts the load.
pub fn parse_entities(json: &str) -> StorageResult<EntityStore> {
    let file = match serde_json::from_str::<EntityDocument>(json)? {
        EntityDocument::Versioned(file) => file,
        EntityDocument::Bare(entities) => EntityFile {
            version: EntityFile::CURRENT_VERSION,
            dimension: None,
            entities,
        },
    };

    if file.version != EntityFile::CURRENT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            expected: EntityFile::CURRENT_VERSION,
            actual: file.version,
        });
    }

    let mut store = match file.dimension {
        Some(dimension) => EntityStore::with_dimension(dimension),
        None => EntityStore::new(),
    };

    for entity in file.entities {
        let id = entity.id.clone();
        match store.upsert(entity) {
            Ok(Some(_)) => tracing::warn!(entity = %id, "duplicate entity id; later record wins"),
            Ok(None) => {}
            Err(source) => return Err(StorageError::InvalidRecord { id, source }),
        }
    }

    Ok(store)
}

/// Loads an entity file from disk.
pub fn load_entities(path: impl AsRef<Path>) -> StorageResult<EntityStore> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let store = parse_entities(&json)?;

    tracing::info!(
        path = %path.display(),
        entities = store.len(),
        dimension = store.dimension().map(|d| d.get()),
        "loaded entity file"
    );

    Ok(store)
}

/// Writes a snapshot as a versioned entity file, creating parent directories.
pub fn save_entities(snapshot: &EntitySnapshot, path: impl AsRef<Path>) -> StorageResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(&EntityFile::from_snapshot(snapshot))?;
    std::fs::write(path, json)?;

    tracing::info!(path = %path.display(), entities = snapshot.len(), "saved entity file");
    Ok(())
}
