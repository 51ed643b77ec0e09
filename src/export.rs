//! Export types for the ownership table.
//!
//! Rows are label-resolved and annotated with the suggested consolidation
//! method next to the one recorded on the root's direct holding, ready for
//! the table surface or JSON output.

use serde::{Deserialize, Serialize};

use crate::classify::{ConsolidationMethod, ConsolidationThresholds};
use crate::graph::index::OwnershipGraph;
use crate::graph::propagate::Propagation;

/// One company's computed ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRow {
    pub company_id: String,
    /// Display name, or the id when the company is unknown.
    pub company_name: String,
    pub country: String,
    /// Ultimate ownership percentage.
    pub ownership_pct: f64,
    /// Advisory only; never replaces a method stored on a relationship.
    pub suggested_method: ConsolidationMethod,
    /// Method on the relationship through which a root holds the company
    /// directly. `None` for indirect holdings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_method: Option<ConsolidationMethod>,
}

/// Build table rows, sorted by ownership desc then company id.
pub fn ownership_rows(
    propagation: &Propagation,
    graph: &OwnershipGraph,
    thresholds: &ConsolidationThresholds,
) -> Vec<OwnershipRow> {
    let mut rows: Vec<OwnershipRow> = propagation
        .ownership
        .iter()
        .map(|(id, &pct)| {
            let company = graph.company(id.as_str());
            let recorded_method = graph
                .incoming(id.as_str())
                .into_iter()
                .find(|edge| propagation.roots.contains(edge.parent))
                .map(|edge| edge.data.method);
            OwnershipRow {
                company_id: id.to_string(),
                company_name: company.map_or_else(|| id.to_string(), |c| c.name.clone()),
                country: company.map(|c| c.country.clone()).unwrap_or_default(),
                ownership_pct: pct,
                suggested_method: thresholds.classify(pct),
                recorded_method,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.ownership_pct
            .total_cmp(&a.ownership_pct)
            .then_with(|| a.company_id.cmp(&b.company_id))
    });
    rows
}

/// Row counts per suggested method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub companies: usize,
    pub full: usize,
    pub equity: usize,
    pub none: usize,
}

impl GroupSummary {
    pub fn from_rows(rows: &[OwnershipRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.companies += 1;
            match row.suggested_method {
                ConsolidationMethod::Full => acc.full += 1,
                ConsolidationMethod::Equity => acc.equity += 1,
                ConsolidationMethod::None => acc.none += 1,
            }
            acc
        })
    }
}

impl std::fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} companies: {} full, {} equity, {} none",
            self.companies, self.full, self.equity, self.none
        )
    }
}
