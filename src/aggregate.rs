//! Multi-root aggregation: one group-wide ownership view per classification.
//!
//! Each root is propagated independently (in parallel when enabled) and the
//! per-root maps are summed per company. Merging always happens in root-id
//! order so the floating-point sums are identical between runs.

use rayon::prelude::*;

use crate::error::EngineError;
use crate::graph::index::OwnershipGraph;
use crate::graph::propagate::{compute_ultimate_ownership, Propagation, PropagationConfig};
use crate::graph::roots::identify_roots;

/// Fold `other` into `acc`: ownership summed per company, roots and warnings
/// appended, depth maxed.
pub fn merge_into(acc: &mut Propagation, other: Propagation) {
    for (company, pct) in other.ownership {
        *acc.ownership.entry(company).or_insert(0.0) += pct;
    }
    acc.roots.extend(other.roots);
    for warning in other.warnings {
        if !acc.warnings.contains(&warning) {
            acc.warnings.push(warning);
        }
    }
    acc.depth_reached = acc.depth_reached.max(other.depth_reached);
}

/// Compute ownership across every root of the classification.
///
/// With no roots the result is empty; that is a normal state for a freshly
/// created classification.
pub fn compute_group_ownership(
    graph: &OwnershipGraph,
    config: &PropagationConfig,
    parallel: bool,
) -> Result<Propagation, EngineError> {
    let roots = identify_roots(graph);
    if roots.is_empty() {
        tracing::debug!(
            classification = %graph.classification(),
            "no roots, group ownership is empty"
        );
        return Ok(Propagation::default());
    }

    let per_root: Vec<Propagation> = if parallel && roots.len() > 1 {
        roots
            .par_iter()
            .map(|root| compute_ultimate_ownership(graph, root.as_str(), config))
            .collect::<Result<_, _>>()?
    } else {
        roots
            .iter()
            .map(|root| compute_ultimate_ownership(graph, root.as_str(), config))
            .collect::<Result<_, _>>()?
    };

    let mut group = Propagation::default();
    for propagation in per_root {
        merge_into(&mut group, propagation);
    }

    tracing::debug!(
        classification = %graph.classification(),
        roots = group.roots.len(),
        companies = group.ownership.len(),
        "aggregated group ownership"
    );
    Ok(group)
}
