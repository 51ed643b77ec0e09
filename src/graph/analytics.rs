//! Graph analytics for data-quality display.
//!
//! Cycle detection runs over the whole classification, independent of any
//! root, so the setup layer can flag circular holdings before anyone asks
//! for an ownership figure.

use petgraph::algo::tarjan_scc;
use serde::Serialize;

use crate::company::CompanyId;

use super::index::OwnershipGraph;

// ---------------------------------------------------------------------------
// Ownership cycles
// ---------------------------------------------------------------------------

/// A set of companies that (directly or indirectly) own each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnershipCycle {
    /// Member companies, sorted by id.
    pub members: Vec<CompanyId>,
}

impl OwnershipCycle {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == id)
    }
}

/// Find every strongly connected component with more than one member.
///
/// Self-ownership edges are rejected when the graph is built, so a
/// single-node component is never a cycle. Returns sorted by size desc, then
/// by first member.
pub fn ownership_cycles(graph: &OwnershipGraph) -> Vec<OwnershipCycle> {
    let g = graph.graph();
    let mut cycles: Vec<OwnershipCycle> = tarjan_scc(g)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut members: Vec<CompanyId> =
                component.iter().map(|idx| g[*idx].clone()).collect();
            members.sort();
            OwnershipCycle { members }
        })
        .collect();

    cycles.sort_by(|a, b| {
        b.size()
            .cmp(&a.size())
            .then_with(|| a.members.first().cmp(&b.members.first()))
    });

    if !cycles.is_empty() {
        tracing::warn!(
            classification = %graph.classification(),
            count = cycles.len(),
            "ownership cycles present"
        );
    }
    cycles
}
