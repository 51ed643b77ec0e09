//! Root discovery: which companies sit at the top of a classification.

use std::collections::BTreeSet;

use crate::company::CompanyId;

use super::index::OwnershipGraph;

/// Identify the root candidates of a classification.
///
/// A root is a parent in at least one edge and a child in none. When no
/// company qualifies (no edges yet, or every parent is also owned), fall
/// back to the companies typed `ultimate-parent`. An empty result means the
/// classification has no discoverable structure; it is not an error.
///
/// The result is sorted by company id.
pub fn identify_roots(graph: &OwnershipGraph) -> Vec<CompanyId> {
    let mut parents = BTreeSet::new();
    let mut children = BTreeSet::new();
    for edge in graph.all_edges() {
        parents.insert(edge.parent);
        children.insert(edge.child);
    }

    let roots: Vec<CompanyId> = parents
        .difference(&children)
        .map(|id| (*id).clone())
        .collect();
    if !roots.is_empty() {
        return roots;
    }

    let mut fallback: Vec<CompanyId> = graph
        .companies()
        .filter(|c| c.is_ultimate_parent())
        .map(|c| c.id.clone())
        .collect();
    fallback.sort();
    fallback.dedup();

    if !fallback.is_empty() {
        tracing::debug!(
            classification = %graph.classification(),
            count = fallback.len(),
            "no structural roots, falling back to ultimate parents"
        );
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{ClassificationId, Company, CompanyType};
    use crate::graph::OwnershipRelationship;

    fn build(companies: &[(&str, CompanyType)], edges: &[(&str, &str)]) -> OwnershipGraph {
        let companies: Vec<Company> = companies
            .iter()
            .map(|(id, t)| Company::new(*id, *id, *t))
            .collect();
        let rels: Vec<OwnershipRelationship> = edges
            .iter()
            .enumerate()
            .map(|(i, (p, c))| {
                OwnershipRelationship::new(format!("r{i}"), *p, *c, 100.0, "legal").unwrap()
            })
            .collect();
        OwnershipGraph::build(&ClassificationId::from("legal"), &companies, &rels)
    }

    use crate::company::CompanyType::{Intermediate, Subsidiary, UltimateParent};

    #[test]
    fn chain_has_single_root() {
        let g = build(
            &[("a", Intermediate), ("b", Subsidiary), ("c", Subsidiary)],
            &[("a", "b"), ("b", "c")],
        );
        assert_eq!(identify_roots(&g), vec![CompanyId::from("a")]);
    }

    #[test]
    fn disjoint_trees_have_two_roots() {
        let g = build(
            &[("a", Subsidiary), ("b", Subsidiary), ("x", Subsidiary), ("y", Subsidiary)],
            &[("x", "y"), ("a", "b")],
        );
        assert_eq!(
            identify_roots(&g),
            vec![CompanyId::from("a"), CompanyId::from("x")]
        );
    }

    #[test]
    fn isolated_companies_are_not_roots() {
        let g = build(
            &[("a", Subsidiary), ("b", Subsidiary), ("lonely", Subsidiary)],
            &[("a", "b")],
        );
        assert_eq!(identify_roots(&g), vec![CompanyId::from("a")]);
    }

    #[test]
    fn cycle_falls_back_to_ultimate_parent() {
        let g = build(
            &[("a", UltimateParent), ("b", Subsidiary)],
            &[("a", "b"), ("b", "a")],
        );
        assert_eq!(identify_roots(&g), vec![CompanyId::from("a")]);
    }

    #[test]
    fn no_edges_uses_ultimate_parents() {
        let g = build(&[("top", UltimateParent), ("b", Subsidiary)], &[]);
        assert_eq!(identify_roots(&g), vec![CompanyId::from("top")]);
    }

    #[test]
    fn no_edges_no_parents_is_empty() {
        let g = build(&[("a", Subsidiary), ("b", Intermediate)], &[]);
        assert!(identify_roots(&g).is_empty());
    }
}
