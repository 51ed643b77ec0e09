// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # lookthrough
//!
//! Ownership-hierarchy consolidation engine: given companies and weighted
//! ownership relationships grouped into hierarchy classifications, compute
//! each company's ultimate (look-through) ownership from the group's roots
//! and suggest the statutory consolidation treatment it implies.
//!
//! ## Architecture
//!
//! - **Graph model** (`graph::index`): petgraph view of one classification
//! - **Roots** (`graph::roots`): top-of-chain discovery with ultimate-parent fallback
//! - **Propagation** (`graph::propagate`): path-summing DFS with cycle and depth guards
//! - **Aggregation** (`aggregate`): rayon fan-out over roots, deterministic merge
//! - **Classifier** (`classify`): FULL / EQUITY / NONE thresholds
//! - **Validation** (`validate`): malformed-input detection and data-quality sweeps
//!
//! ## Library usage
//!
//! ```no_run
//! use lookthrough::company::{Company, CompanyType, HierarchyClassification};
//! use lookthrough::engine::Engine;
//! use lookthrough::graph::OwnershipRelationship;
//! use lookthrough::snapshot::Snapshot;
//!
//! let snapshot = Snapshot::new(
//!     vec![
//!         Company::new("hold", "Holding plc", CompanyType::UltimateParent),
//!         Company::new("opco", "Operating Ltd", CompanyType::Subsidiary),
//!     ],
//!     vec![HierarchyClassification::new("legal", "Legal ownership")],
//!     vec![OwnershipRelationship::new("r1", "hold", "opco", 80.0, "legal").unwrap()],
//! );
//! let engine = Engine::default();
//! let group = engine.compute_group_ownership(&snapshot, "legal").unwrap();
//! assert_eq!(group.get("opco"), Some(80.0));
//! ```

pub mod aggregate;
pub mod classify;
pub mod company;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod snapshot;
pub mod validate;
