//! End-to-end tests for the lookthrough engine.
//!
//! These tests drive the public `Engine` facade over in-memory snapshots,
//! covering roots, single-root and group propagation, classification, and
//! the data-quality paths (cycles, dangling edges, empty classifications).

use lookthrough::classify::ConsolidationMethod;
use lookthrough::company::{Company, CompanyId, CompanyType, HierarchyClassification};
use lookthrough::config::EngineConfig;
use lookthrough::engine::Engine;
use lookthrough::error::{EngineError, LookthroughError};
use lookthrough::graph::OwnershipRelationship;
use lookthrough::graph::propagate::PropagationWarning;
use lookthrough::snapshot::Snapshot;

fn company(id: &str, company_type: CompanyType) -> Company {
    Company::new(id, format!("{} Ltd", id.to_uppercase()), company_type)
}

fn rel(id: &str, parent: &str, child: &str, pct: f64) -> OwnershipRelationship {
    OwnershipRelationship::new(id, parent, child, pct, "legal").unwrap()
}

fn snapshot(companies: Vec<Company>, relationships: Vec<OwnershipRelationship>) -> Snapshot {
    Snapshot::new(
        companies,
        vec![
            HierarchyClassification::new("legal", "Legal ownership"),
            HierarchyClassification::new("region", "Regional management"),
        ],
        relationships,
    )
}

fn subsidiaries(ids: &[&str]) -> Vec<Company> {
    ids.iter().map(|id| company(id, CompanyType::Subsidiary)).collect()
}

fn ids(list: &[&str]) -> Vec<CompanyId> {
    list.iter().map(|s| CompanyId::from(*s)).collect()
}

#[test]
fn chain_multiplication() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c"]),
        vec![rel("r1", "a", "b", 80.0), rel("r2", "b", "c", 50.0)],
    );
    let result = Engine::default()
        .compute_ultimate_ownership(&snap, "legal", "a")
        .unwrap();
    assert_eq!(result.ownership.len(), 2);
    assert_eq!(result.get("b"), Some(80.0));
    assert_eq!(result.get("c"), Some(40.0));
}

#[test]
fn diamond_summation() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c", "d"]),
        vec![
            rel("r1", "a", "b", 100.0),
            rel("r2", "a", "c", 100.0),
            rel("r3", "b", "d", 50.0),
            rel("r4", "c", "d", 50.0),
        ],
    );
    let result = Engine::default()
        .compute_ultimate_ownership(&snap, "legal", "a")
        .unwrap();
    assert_eq!(result.get("b"), Some(100.0));
    assert_eq!(result.get("c"), Some(100.0));
    assert_eq!(result.get("d"), Some(100.0));
}

#[test]
fn classifier_thresholds() {
    let engine = Engine::default();
    assert_eq!(engine.suggest_consolidation_method(60.0), ConsolidationMethod::Full);
    assert_eq!(engine.suggest_consolidation_method(50.0), ConsolidationMethod::Equity);
    assert_eq!(engine.suggest_consolidation_method(20.0), ConsolidationMethod::Equity);
    assert_eq!(engine.suggest_consolidation_method(19.9), ConsolidationMethod::None);
}

#[test]
fn root_detection() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c"]),
        vec![rel("r1", "a", "b", 100.0), rel("r2", "b", "c", 100.0)],
    );
    assert_eq!(
        Engine::default().identify_roots(&snap, "legal").unwrap(),
        ids(&["a"])
    );
}

#[test]
fn no_edges_classification_is_empty() {
    let snap = snapshot(subsidiaries(&["a", "b"]), vec![]);
    let engine = Engine::default();
    assert!(engine.identify_roots(&snap, "legal").unwrap().is_empty());
    let group = engine.compute_group_ownership(&snap, "legal").unwrap();
    assert!(group.ownership.is_empty());
    assert!(group.warnings.is_empty());
}

#[test]
fn cycle_safety() {
    let snap = snapshot(
        subsidiaries(&["a", "b"]),
        vec![rel("r1", "a", "b", 100.0), rel("r2", "b", "a", 100.0)],
    );
    let engine = Engine::default();
    let result = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    assert_eq!(result.get("b"), Some(100.0));
    assert!(result.get("a").is_none());
    assert!(result.has_cycles());

    // Pure cycle: no structural root and no ultimate parent, so the group
    // view is empty rather than looping.
    assert!(engine.compute_group_ownership(&snap, "legal").unwrap().is_empty());

    let cycles = engine.cycles(&snap, "legal").unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].members, ids(&["a", "b"]));
}

#[test]
fn cycle_with_ultimate_parent_fallback() {
    let mut companies = subsidiaries(&["b", "c"]);
    companies.push(company("top", CompanyType::UltimateParent));
    let snap = snapshot(
        companies,
        vec![
            rel("r1", "top", "b", 100.0),
            rel("r2", "b", "c", 60.0),
            rel("r3", "c", "top", 10.0),
        ],
    );
    let group = Engine::default().compute_group_ownership(&snap, "legal").unwrap();
    assert_eq!(group.roots, ids(&["top"]));
    assert_eq!(group.get("b"), Some(100.0));
    assert_eq!(group.get("c"), Some(60.0));
    assert!(group.get("top").is_none());
    assert!(group.has_cycles());
}

#[test]
fn idempotence() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c", "d"]),
        vec![
            rel("r1", "a", "b", 51.0),
            rel("r2", "a", "c", 49.0),
            rel("r3", "b", "d", 33.3),
            rel("r4", "c", "d", 17.6),
        ],
    );
    let engine = Engine::default();
    let first = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    let second = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        engine.compute_group_ownership(&snap, "legal").unwrap(),
        engine.compute_group_ownership(&snap, "legal").unwrap()
    );
}

#[test]
fn multi_root_merge_of_disjoint_trees() {
    let snap = snapshot(
        subsidiaries(&["a", "a1", "a2", "x", "x1"]),
        vec![
            rel("r1", "a", "a1", 100.0),
            rel("r2", "a1", "a2", 70.0),
            rel("r3", "x", "x1", 100.0),
        ],
    );
    let engine = Engine::default();
    let group = engine.compute_group_ownership(&snap, "legal").unwrap();
    let a = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    let x = engine.compute_ultimate_ownership(&snap, "legal", "x").unwrap();

    let mut union = a.ownership;
    union.extend(x.ownership);
    assert_eq!(group.ownership, union);
    assert_eq!(group.roots, ids(&["a", "x"]));
}

#[test]
fn classifications_never_mix() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c"]),
        vec![
            rel("r1", "a", "b", 100.0),
            OwnershipRelationship::new("r2", "b", "c", 100.0, "region").unwrap(),
        ],
    );
    let engine = Engine::default();
    let legal = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    assert!(legal.get("c").is_none());
    assert_eq!(
        engine.identify_roots(&snap, "region").unwrap(),
        ids(&["b"])
    );
}

#[test]
fn dangling_reference_is_a_dead_end() {
    let snap = snapshot(
        subsidiaries(&["a", "b"]),
        vec![rel("r1", "a", "b", 90.0), rel("r2", "b", "gone", 40.0)],
    );
    let result = Engine::default()
        .compute_ultimate_ownership(&snap, "legal", "a")
        .unwrap();
    assert_eq!(result.ownership.len(), 1);
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        PropagationWarning::DanglingEdge { missing, .. } if missing.as_str() == "gone"
    )));
}

#[test]
fn unknown_root_and_classification_are_errors() {
    let snap = snapshot(subsidiaries(&["a", "b"]), vec![rel("r1", "a", "b", 90.0)]);
    let engine = Engine::default();
    assert!(matches!(
        engine.compute_ultimate_ownership(&snap, "legal", "nobody"),
        Err(LookthroughError::Engine(EngineError::UnknownRoot { .. }))
    ));
    assert!(matches!(
        engine.compute_group_ownership(&snap, "tax"),
        Err(LookthroughError::Engine(EngineError::UnknownClassification { .. }))
    ));
}

#[test]
fn ownership_table_annotates_group() {
    let mut companies = subsidiaries(&["b", "c", "d"]);
    companies.push(company("hold", CompanyType::UltimateParent));
    let snap = snapshot(
        companies,
        vec![
            rel("r1", "hold", "b", 100.0),
            rel("r2", "b", "c", 45.0),
            rel("r3", "c", "d", 30.0),
        ],
    );
    let table = Engine::default().ownership_table(&snap, "legal", None).unwrap();
    let methods: Vec<(&str, ConsolidationMethod)> = table
        .rows
        .iter()
        .map(|r| (r.company_id.as_str(), r.suggested_method))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("b", ConsolidationMethod::Full),
            ("c", ConsolidationMethod::Equity),
            ("d", ConsolidationMethod::None),
        ]
    );
    assert_eq!(table.rows[0].company_name, "B Ltd");
    assert_eq!(table.rows[0].recorded_method, Some(ConsolidationMethod::Full));
    assert!(table.rows[1].recorded_method.is_none());
    assert_eq!(table.summary.companies, 3);
}

#[test]
fn depth_ceiling_from_config() {
    let snap = snapshot(
        subsidiaries(&["a", "b", "c", "d"]),
        vec![
            rel("r1", "a", "b", 100.0),
            rel("r2", "b", "c", 100.0),
            rel("r3", "c", "d", 100.0),
        ],
    );
    let engine = Engine::new(EngineConfig {
        max_depth: 1,
        ..Default::default()
    })
    .unwrap();
    let result = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    assert_eq!(result.ownership.len(), 1);
    assert!(matches!(
        &result.warnings[..],
        [PropagationWarning::DepthTruncated { depth: 1, .. }]
    ));
}

#[test]
fn validation_sweep_reports_malformed_input() {
    let mut bad_pct = rel("r2", "a", "b", 10.0);
    bad_pct.direct_pct = 140.0;
    let snap = snapshot(
        subsidiaries(&["a", "b"]),
        vec![rel("r1", "a", "b", 60.0), bad_pct, rel("r3", "a", "nobody", 5.0)],
    );
    let engine = Engine::default();
    let report = engine.validate(&snap);
    assert_eq!(report.len(), 2);

    // The malformed edge never reaches the traversal.
    let result = engine.compute_ultimate_ownership(&snap, "legal", "a").unwrap();
    assert_eq!(result.get("b"), Some(60.0));
}
