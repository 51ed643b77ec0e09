//! In-memory ownership graph for one hierarchy classification.
//!
//! Uses `petgraph` for the graph structure and a `HashMap` for O(1) lookups
//! by company id. The graph is built from an immutable snapshot per query and
//! never mutated afterwards.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::company::{ClassificationId, Company, CompanyId};
use crate::error::ValidationError;

use super::{EdgeData, OwnershipRelationship};

/// A relationship that was left out of the graph because one of its
/// endpoints is not a known company.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingEdge {
    pub relationship_id: String,
    pub parent_id: CompanyId,
    pub child_id: CompanyId,
    /// The endpoint that could not be resolved.
    pub missing: CompanyId,
}

/// Borrowed view of one ownership edge.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipEdge<'a> {
    pub parent: &'a CompanyId,
    pub child: &'a CompanyId,
    pub data: &'a EdgeData,
}

/// Ownership graph of a single classification backed by petgraph.
///
/// Every company of the snapshot becomes a node, related or not. Only edges
/// of the requested classification are inserted; edges with unknown
/// endpoints are kept aside as [`DanglingEdge`]s and malformed ones as
/// rejected [`ValidationError`]s, so traversal never sees them.
pub struct OwnershipGraph {
    classification: ClassificationId,
    /// Nodes are CompanyIds, edges carry EdgeData.
    graph: DiGraph<CompanyId, EdgeData>,
    /// CompanyId → NodeIndex mapping for O(1) node lookups.
    node_index: HashMap<CompanyId, NodeIndex>,
    companies: HashMap<CompanyId, Company>,
    dangling: Vec<DanglingEdge>,
    rejected: Vec<ValidationError>,
}

impl OwnershipGraph {
    /// Build the graph of `classification` from a set of companies and
    /// relationships. Relationships of other classifications are ignored.
    pub fn build(
        classification: &ClassificationId,
        companies: &[Company],
        relationships: &[OwnershipRelationship],
    ) -> Self {
        let mut graph = DiGraph::with_capacity(companies.len(), relationships.len());
        let mut node_index = HashMap::with_capacity(companies.len());
        let mut company_map = HashMap::with_capacity(companies.len());

        for company in companies {
            if !node_index.contains_key(&company.id) {
                let idx = graph.add_node(company.id.clone());
                node_index.insert(company.id.clone(), idx);
            }
            // Later duplicates shadow earlier records.
            company_map.insert(company.id.clone(), company.clone());
        }

        let mut dangling = Vec::new();
        let mut rejected = Vec::new();

        for rel in relationships
            .iter()
            .filter(|r| &r.classification_id == classification)
        {
            if let Err(e) = rel.check_shape() {
                tracing::warn!(relationship = %rel.id, error = %e, "skipping malformed relationship");
                rejected.push(e);
                continue;
            }

            let parent = node_index.get(&rel.parent_id).copied();
            let child = node_index.get(&rel.child_id).copied();
            match (parent, child) {
                (Some(p), Some(c)) => {
                    graph.add_edge(p, c, EdgeData::from(rel));
                }
                _ => {
                    let missing = if parent.is_none() {
                        rel.parent_id.clone()
                    } else {
                        rel.child_id.clone()
                    };
                    tracing::warn!(
                        relationship = %rel.id,
                        missing = %missing,
                        "relationship references unknown company, treating as dead end"
                    );
                    dangling.push(DanglingEdge {
                        relationship_id: rel.id.clone(),
                        parent_id: rel.parent_id.clone(),
                        child_id: rel.child_id.clone(),
                        missing,
                    });
                }
            }
        }

        tracing::debug!(
            classification = %classification,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dangling = dangling.len(),
            "built ownership graph"
        );

        Self {
            classification: classification.clone(),
            graph,
            node_index,
            companies: company_map,
            dangling,
            rejected,
        }
    }

    /// The classification this graph was built for.
    pub fn classification(&self) -> &ClassificationId {
        &self.classification
    }

    /// Look up a company by id.
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// All companies, in node insertion order.
    pub fn companies(&self) -> impl Iterator<Item = &Company> + '_ {
        self.graph
            .node_indices()
            .filter_map(|idx| self.companies.get(&self.graph[idx]))
    }

    /// Edges where `id` is the parent.
    pub fn outgoing(&self, id: &str) -> Vec<OwnershipEdge<'_>> {
        self.edges(id, Direction::Outgoing)
    }

    /// Edges where `id` is the child.
    pub fn incoming(&self, id: &str) -> Vec<OwnershipEdge<'_>> {
        self.edges(id, Direction::Incoming)
    }

    fn edges(&self, id: &str, direction: Direction) -> Vec<OwnershipEdge<'_>> {
        let Some(&idx) = self.node_index.get(id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|e| OwnershipEdge {
                parent: &self.graph[e.source()],
                child: &self.graph[e.target()],
                data: e.weight(),
            })
            .collect()
    }

    /// Direct owners of `id`.
    pub fn parents_of(&self, id: &str) -> Vec<&CompanyId> {
        self.incoming(id).into_iter().map(|e| e.parent).collect()
    }

    /// Direct holdings of `id`.
    pub fn children_of(&self, id: &str) -> Vec<&CompanyId> {
        self.outgoing(id).into_iter().map(|e| e.child).collect()
    }

    /// All edges of the classification.
    pub fn all_edges(&self) -> Vec<OwnershipEdge<'_>> {
        self.graph
            .edge_references()
            .map(|e| OwnershipEdge {
                parent: &self.graph[e.source()],
                child: &self.graph[e.target()],
                data: e.weight(),
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Relationships skipped because an endpoint is unknown.
    pub fn dangling(&self) -> &[DanglingEdge] {
        &self.dangling
    }

    /// Relationships skipped because they fail shape validation.
    pub fn rejected(&self) -> &[ValidationError] {
        &self.rejected
    }

    pub(crate) fn graph(&self) -> &DiGraph<CompanyId, EdgeData> {
        &self.graph
    }

    pub(crate) fn node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }
}

impl std::fmt::Debug for OwnershipGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipGraph")
            .field("classification", &self.classification)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("dangling", &self.dangling.len())
            .finish()
    }
}
