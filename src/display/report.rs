//! Command results that render as tables in text mode and as plain data
//! in JSON mode.

use crate::display::tables::{TableBuilder, join_limited};
use crate::display::theme::THEME;
use crate::query::{EntityFilter, StoreStats};
use crate::storage::EntitySnapshot;
use crate::types::EntityId;
use crate::vector::{Cluster, ClusteringResult, SimilarityResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Member names shown per cluster row before eliding.
const MEMBER_PREVIEW: usize = 8;

/// Output of `entity-atlas cluster`.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub k: usize,
    pub passes: usize,
    pub clustered: usize,
    pub filter: EntityFilter,
    pub clusters: Vec<Cluster>,
    #[serde(skip)]
    names: HashMap<EntityId, String>,
}

impl ClusterReport {
    /// Builds the report, resolving member names against `snapshot`.
    pub fn new(
        result: ClusteringResult,
        filter: EntityFilter,
        k: usize,
        snapshot: &EntitySnapshot,
    ) -> Self {
        let names = result
            .clusters
            .iter()
            .flat_map(|cluster| cluster.members.iter())
            .filter_map(|id| {
                snapshot
                    .get(id.as_str())
                    .map(|entity| (id.clone(), entity.display_name.clone()))
            })
            .collect();

        Self {
            k,
            passes: result.passes,
            clustered: result.clusters.iter().map(Cluster::len).sum(),
            filter,
            clusters: result.clusters,
            names,
        }
    }

    fn name_of<'a>(&'a self, id: &'a EntityId) -> &'a str {
        self.names.get(id).map_or(id.as_str(), String::as_str)
    }
}

impl fmt::Display for ClusterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} entities into {} clusters ({} pass{})",
            THEME.apply(&THEME.header, "Clustered"),
            THEME.apply(&THEME.number, self.clustered),
            THEME.apply(&THEME.number, self.k),
            self.passes,
            if self.passes == 1 { "" } else { "es" },
        )?;

        let rows = self.clusters.iter().map(|cluster| {
            vec![
                cluster.cluster_id.to_string(),
                cluster.len().to_string(),
                join_limited(
                    cluster.members.iter().map(|id| self.name_of(id)),
                    cluster.len(),
                    MEMBER_PREVIEW,
                ),
            ]
        });

        let table = TableBuilder::new()
            .set_headers(vec!["Cluster", "Size", "Members"])
            .add_rows(rows)
            .align_right(1)
            .build();
        write!(f, "{table}")
    }
}

/// Output of `entity-atlas similar`.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub query: EntityId,
    pub results: Vec<SimilarityResult>,
    #[serde(skip)]
    names: HashMap<EntityId, String>,
}

impl SimilarityReport {
    pub fn new(query: EntityId, results: Vec<SimilarityResult>, snapshot: &EntitySnapshot) -> Self {
        let names = results
            .iter()
            .map(|r| &r.entity_id)
            .chain(std::iter::once(&query))
            .filter_map(|id| {
                snapshot
                    .get(id.as_str())
                    .map(|entity| (id.clone(), entity.display_name.clone()))
            })
            .collect();

        Self {
            query,
            results,
            names,
        }
    }
}

impl fmt::Display for SimilarityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query_name = self
            .names
            .get(&self.query)
            .map_or(self.query.as_str(), String::as_str);

        if self.results.is_empty() {
            return write!(
                f,
                "{}",
                THEME.apply(&THEME.dim, format!("No other entities to compare with '{query_name}'"))
            );
        }

        writeln!(
            f,
            "{} {query_name} ({})",
            THEME.apply(&THEME.header, "Most similar to"),
            self.query
        )?;

        let rows = self.results.iter().enumerate().map(|(rank, result)| {
            vec![
                (rank + 1).to_string(),
                result.entity_id.to_string(),
                self.names
                    .get(&result.entity_id)
                    .cloned()
                    .unwrap_or_default(),
                format!("{:.4}", result.similarity_score),
            ]
        });

        let table = TableBuilder::new()
            .set_headers(vec!["#", "Entity", "Name", "Score"])
            .add_rows(rows)
            .align_right(0)
            .align_right(3)
            .build();
        write!(f, "{table}")
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dimension = self
            .dimension
            .map_or_else(|| "unset".to_string(), |d| d.to_string());

        let mut builder = TableBuilder::new()
            .set_headers(vec!["Metric", "Value"])
            .add_row(vec!["Entities".to_string(), self.entity_count.to_string()])
            .add_row(vec!["Dimension".to_string(), dimension]);

        for (entity_type, count) in &self.by_type {
            builder = builder.add_row(vec![format!("  {entity_type}"), count.to_string()]);
        }

        write!(f, "{}", builder.align_right(1).build())
    }
}
