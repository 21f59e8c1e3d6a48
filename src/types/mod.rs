use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::str::FromStr;

pub type CompactString = Box<str>;

pub fn compact_string(s: &str) -> CompactString {
    s.into()
}

/// Stable, opaque identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(CompactString);

impl EntityId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(compact_string(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id.into_boxed_str())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of business entity an embedding describes.
///
/// Names are matched case-insensitively; anything outside the known set is
/// kept as `Other` with its lowercased name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    User,
    Company,
    Product,
    Workflow,
    Agent,
    Other(CompactString),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::User => "user",
            EntityType::Company => "company",
            EntityType::Product => "product",
            EntityType::Workflow => "workflow",
            EntityType::Agent => "agent",
            EntityType::Other(name) => name,
        }
    }
}

impl FromStr for EntityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Ok(match lowered.as_str() {
            "user" => EntityType::User,
            "company" => EntityType::Company,
            "product" => EntityType::Product,
            "workflow" => EntityType::Workflow,
            "agent" => EntityType::Agent,
            _ => EntityType::Other(lowered.into_boxed_str()),
        })
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<EntityType> for String {
    fn from(kind: EntityType) -> String {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary attributes carried with an entity but never interpreted.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// One entity and its embedding vector.
///
/// Records are replaced whole; nothing in this crate mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEmbedding {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub display_name: String,
    pub vector: Vec<f32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl EntityEmbedding {
    pub fn new(
        id: impl Into<EntityId>,
        entity_type: EntityType,
        display_name: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type,
            display_name: display_name.into(),
            vector,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
