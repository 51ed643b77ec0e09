//! Engine facade: top-level API for the lookthrough system.
//!
//! The `Engine` holds only configuration. Every operation takes the caller's
//! current [`Snapshot`], builds the classification's graph, computes, and
//! returns; nothing is cached between calls.

use serde::Serialize;

use crate::aggregate::compute_group_ownership;
use crate::classify::ConsolidationMethod;
use crate::company::{ClassificationId, CompanyId};
use crate::config::EngineConfig;
use crate::error::{EngineError, LookthroughResult};
use crate::export::{ownership_rows, GroupSummary, OwnershipRow};
use crate::graph::analytics::{ownership_cycles, OwnershipCycle};
use crate::graph::index::OwnershipGraph;
use crate::graph::propagate::{compute_ultimate_ownership, Propagation};
use crate::graph::roots::identify_roots;
use crate::snapshot::Snapshot;
use crate::validate::{validate_snapshot, ValidationReport};

/// Rows plus the propagation they were built from.
#[derive(Debug, Clone, Serialize)]
pub struct OwnershipTable {
    pub classification_id: ClassificationId,
    pub propagation: Propagation,
    pub rows: Vec<OwnershipRow>,
    pub summary: GroupSummary,
}

/// The ownership-hierarchy consolidation engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: EngineConfig) -> LookthroughResult<Self> {
        if config.max_depth == 0 {
            return Err(EngineError::InvalidConfig {
                message: "max_depth must be > 0".into(),
            }
            .into());
        }
        if !config.thresholds.is_valid() {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "thresholds must be finite with equity_from ({}) <= full_above ({})",
                    config.thresholds.equity_from, config.thresholds.full_above
                ),
            }
            .into());
        }

        tracing::info!(
            max_depth = config.max_depth,
            full_above = config.thresholds.full_above,
            equity_from = config.thresholds.equity_from,
            parallel = config.parallel_roots,
            "initializing lookthrough engine"
        );
        Ok(Self { config })
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the graph of a classification, rejecting ids the snapshot has
    /// never heard of (neither declared nor used by any relationship).
    pub fn graph(&self, snapshot: &Snapshot, classification_id: &str) -> LookthroughResult<OwnershipGraph> {
        let known = snapshot.classification(classification_id).is_some()
            || snapshot
                .relationships
                .iter()
                .any(|r| r.classification_id.as_str() == classification_id);
        if !known {
            return Err(EngineError::UnknownClassification {
                classification_id: classification_id.to_string(),
            }
            .into());
        }
        Ok(snapshot.graph(&ClassificationId::from(classification_id)))
    }

    /// Top-of-chain companies of a classification.
    pub fn identify_roots(
        &self,
        snapshot: &Snapshot,
        classification_id: &str,
    ) -> LookthroughResult<Vec<CompanyId>> {
        let graph = self.graph(snapshot, classification_id)?;
        Ok(identify_roots(&graph))
    }

    /// Ultimate ownership held by a single root.
    pub fn compute_ultimate_ownership(
        &self,
        snapshot: &Snapshot,
        classification_id: &str,
        root_id: &str,
    ) -> LookthroughResult<Propagation> {
        let graph = self.graph(snapshot, classification_id)?;
        Ok(compute_ultimate_ownership(
            &graph,
            root_id,
            &self.config.propagation(),
        )?)
    }

    /// Ultimate ownership across every root of a classification.
    pub fn compute_group_ownership(
        &self,
        snapshot: &Snapshot,
        classification_id: &str,
    ) -> LookthroughResult<Propagation> {
        let graph = self.graph(snapshot, classification_id)?;
        Ok(compute_group_ownership(
            &graph,
            &self.config.propagation(),
            self.config.parallel_roots,
        )?)
    }

    /// Suggest a consolidation method under the configured thresholds.
    pub fn suggest_consolidation_method(&self, percentage: f64) -> ConsolidationMethod {
        self.config.thresholds.classify(percentage)
    }

    /// Annotated ownership table for one root, or for the whole group when
    /// `root_id` is `None`.
    pub fn ownership_table(
        &self,
        snapshot: &Snapshot,
        classification_id: &str,
        root_id: Option<&str>,
    ) -> LookthroughResult<OwnershipTable> {
        let graph = self.graph(snapshot, classification_id)?;
        let propagation = match root_id {
            Some(root) => compute_ultimate_ownership(&graph, root, &self.config.propagation())?,
            None => compute_group_ownership(
                &graph,
                &self.config.propagation(),
                self.config.parallel_roots,
            )?,
        };
        let rows = ownership_rows(&propagation, &graph, &self.config.thresholds);
        let summary = GroupSummary::from_rows(&rows);
        Ok(OwnershipTable {
            classification_id: graph.classification().clone(),
            propagation,
            rows,
            summary,
        })
    }

    /// Ownership cycles of a classification.
    pub fn cycles(
        &self,
        snapshot: &Snapshot,
        classification_id: &str,
    ) -> LookthroughResult<Vec<OwnershipCycle>> {
        let graph = self.graph(snapshot, classification_id)?;
        Ok(ownership_cycles(&graph))
    }

    /// Data-quality sweep of the whole snapshot.
    pub fn validate(&self, snapshot: &Snapshot) -> ValidationReport {
        validate_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConsolidationThresholds;
    use crate::error::LookthroughError;

    #[test]
    fn zero_depth_rejected() {
        let result = Engine::new(EngineConfig {
            max_depth: 0,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(LookthroughError::Engine(EngineError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let result = Engine::new(EngineConfig {
            thresholds: ConsolidationThresholds {
                full_above: 10.0,
                equity_from: 40.0,
            },
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn unknown_classification_is_an_error() {
        let engine = Engine::default();
        let err = engine.identify_roots(&Snapshot::default(), "legal").unwrap_err();
        assert!(matches!(
            err,
            LookthroughError::Engine(EngineError::UnknownClassification { .. })
        ));
    }

    #[test]
    fn suggestion_uses_configured_thresholds() {
        let engine = Engine::new(EngineConfig {
            thresholds: ConsolidationThresholds {
                full_above: 75.0,
                equity_from: 25.0,
            },
            ..Default::default()
        })
        .unwrap();
        assert_eq!(engine.suggest_consolidation_method(60.0), ConsolidationMethod::Equity);
        assert_eq!(
            Engine::default().suggest_consolidation_method(60.0),
            ConsolidationMethod::Full
        );
    }
}
