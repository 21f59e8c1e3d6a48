#![allow(dead_code)]

use entity_atlas::{EntityEmbedding, EntityStore, EntityType, QueryFacade};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn entity(id: &str, entity_type: EntityType, vector: Vec<f32>) -> EntityEmbedding {
    EntityEmbedding::new(id, entity_type, id.to_uppercase(), vector)
}

pub fn facade_with(entities: Vec<EntityEmbedding>) -> QueryFacade {
    QueryFacade::new(EntityStore::from_entities(entities).expect("fixture entities are valid"))
}

/// A small CRM-like store: users, companies, agents and a workflow in 3-D.
pub fn crm_entities() -> Vec<EntityEmbedding> {
    vec![
        EntityEmbedding::new("usr-1", EntityType::User, "Ada Lovelace", vec![1.0, 0.1, 0.0]),
        EntityEmbedding::new("usr-2", EntityType::User, "Grace Hopper", vec![0.9, 0.2, 0.1]),
        EntityEmbedding::new("cmp-1", EntityType::Company, "Acme Corp", vec![0.0, 1.0, 0.2]),
        EntityEmbedding::new("cmp-2", EntityType::Company, "Globex", vec![0.1, 0.9, 0.0]),
        EntityEmbedding::new("agt-1", EntityType::Agent, "Sales Agent", vec![0.2, 0.1, 1.0]),
        EntityEmbedding::new("agt-2", EntityType::Agent, "Support Agent", vec![0.0, 0.2, 0.9]),
        EntityEmbedding::new("wfl-1", EntityType::Workflow, "Invoice approval", vec![0.5, 0.5, 0.5]),
    ]
}

/// Seeded random vectors in `[-1, 1)`; the same call always yields the same store.
pub fn generated_entities(count: usize, dimension: usize) -> Vec<EntityEmbedding> {
    let mut rng = StdRng::seed_from_u64(0x2545_F491);

    (0..count)
        .map(|i| {
            let vector = (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect();
            EntityEmbedding::new(format!("gen-{i}"), EntityType::Product, format!("Item {i}"), vector)
        })
        .collect()
}

pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
