//! Snapshot of the setup layer's companies, classifications and relationships.
//!
//! The surrounding application owns persistence; the engine only ever sees a
//! consistent, immutable snapshot handed in per query. The JSON shape matches
//! the application's export (camelCase fields, unknown fields ignored).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::company::{ClassificationId, Company, HierarchyClassification};
use crate::error::SnapshotError;
use crate::graph::index::OwnershipGraph;
use crate::graph::OwnershipRelationship;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default, alias = "hierarchyTypes")]
    pub classifications: Vec<HierarchyClassification>,
    #[serde(default)]
    pub relationships: Vec<OwnershipRelationship>,
}

impl Snapshot {
    pub fn new(
        companies: Vec<Company>,
        classifications: Vec<HierarchyClassification>,
        relationships: Vec<OwnershipRelationship>,
    ) -> Self {
        Self {
            companies,
            classifications,
            relationships,
        }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let snapshot: Self = serde_json::from_str(&content).map_err(|e| SnapshotError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            companies = snapshot.companies.len(),
            classifications = snapshot.classifications.len(),
            relationships = snapshot.relationships.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Look up a company by id. With duplicate ids the last record wins, as
    /// in the graph.
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().rev().find(|c| c.id.as_str() == id)
    }

    pub fn classification(&self, id: &str) -> Option<&HierarchyClassification> {
        self.classifications.iter().find(|c| c.id.as_str() == id)
    }

    /// Build the ownership graph of one classification.
    pub fn graph(&self, classification: &ClassificationId) -> OwnershipGraph {
        OwnershipGraph::build(classification, &self.companies, &self.relationships)
    }
}
