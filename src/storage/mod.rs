//! Entity storage.
//!
//! - `memory`: the canonical in-process store and its immutable snapshots
//! - `shared`: a lock-guarded handle for multi-threaded hosts
//! - `persistence`: JSON entity files used by the CLI

pub mod error;
pub mod memory;
pub mod persistence;
pub mod shared;

pub use error::{StorageError, StorageResult};
pub use memory::{EntitySnapshot, EntityStore};
pub use persistence::{EntityFile, load_entities, parse_entities, save_entities};
pub use shared::SharedEntityStore;
