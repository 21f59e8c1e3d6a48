//! Display filters applied before clustering.

use crate::types::{EntityEmbedding, EntityType};
use serde::{Deserialize, Serialize};

/// Entity-type and name filter.
///
/// Both parts are optional; an empty filter matches everything. The name
/// filter is a case-insensitive substring match on `display_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
}

impl EntityFilter {
    /// Filter that matches every entity.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entity_type.is_none() && self.name_contains.as_deref().is_none_or(str::is_empty)
    }

    /// Lowered once so each match is a single `contains`.
    pub(crate) fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            entity_type: self.entity_type.as_ref(),
            needle: self
                .name_contains
                .as_deref()
                .filter(|needle| !needle.is_empty())
                .map(str::to_lowercase),
        }
    }

    pub fn matches(&self, entity: &EntityEmbedding) -> bool {
        self.compile().matches(entity)
    }
}

pub(crate) struct CompiledFilter<'a> {
    entity_type: Option<&'a EntityType>,
    needle: Option<String>,
}

impl CompiledFilter<'_> {
    pub(crate) fn matches(&self, entity: &EntityEmbedding) -> bool {
        if let Some(entity_type) = self.entity_type {
            if &entity.entity_type != entity_type {
                return false;
            }
        }

        match &self.needle {
            Some(needle) => entity.display_name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}
