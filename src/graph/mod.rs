//! Ownership graph: companies as nodes, weighted ownership stakes as edges.
//!
//! - **Relationships** ([`OwnershipRelationship`]): the caller-supplied edge records
//! - **Graph model** ([`index::OwnershipGraph`]): a `petgraph` view of one classification
//! - **Roots** ([`roots`]): top-of-chain discovery
//! - **Propagation** ([`propagate`]): look-through ownership from a root
//! - **Analytics** ([`analytics`]): cycle detection for data-quality display

pub mod analytics;
pub mod index;
pub mod propagate;
pub mod roots;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::{suggest_method, ConsolidationMethod};
use crate::company::{ClassificationId, CompanyId};
use crate::error::ValidationError;

/// A directed, weighted ownership edge from `parent_id` to `child_id` within
/// one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipRelationship {
    pub id: String,
    pub parent_id: CompanyId,
    pub child_id: CompanyId,
    /// Direct ownership on the 0–100 scale.
    pub direct_pct: f64,
    #[serde(alias = "hierarchyTypeId")]
    pub classification_id: ClassificationId,
    /// Method chosen by a user. `None` means "use the suggestion".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_method: Option<ConsolidationMethod>,
    /// Carried for display; ownership queries ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<NaiveDate>,
}

impl OwnershipRelationship {
    /// Create a relationship, rejecting self-ownership and out-of-range stakes.
    ///
    /// The consolidation method defaults to the classifier's suggestion for
    /// `direct_pct`.
    pub fn new(
        id: impl Into<String>,
        parent_id: impl Into<CompanyId>,
        child_id: impl Into<CompanyId>,
        direct_pct: f64,
        classification_id: impl Into<ClassificationId>,
    ) -> Result<Self, ValidationError> {
        let rel = Self {
            id: id.into(),
            parent_id: parent_id.into(),
            child_id: child_id.into(),
            direct_pct,
            classification_id: classification_id.into(),
            consolidation_method: None,
            effective_from: None,
        };
        rel.check_shape()?;
        Ok(Self {
            consolidation_method: Some(suggest_method(direct_pct)),
            ..rel
        })
    }

    /// Override the suggested consolidation method.
    pub fn with_method(mut self, method: ConsolidationMethod) -> Self {
        self.consolidation_method = Some(method);
        self
    }

    /// The stored method, or the suggestion when none was chosen.
    pub fn method(&self) -> ConsolidationMethod {
        self.consolidation_method
            .unwrap_or_else(|| suggest_method(self.direct_pct))
    }

    /// Checks that need no context beyond the record itself.
    pub fn check_shape(&self) -> Result<(), ValidationError> {
        if self.parent_id == self.child_id {
            return Err(ValidationError::SelfOwnership {
                relationship_id: self.id.clone(),
                company_id: self.parent_id.to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.direct_pct) {
            return Err(ValidationError::PercentageOutOfRange {
                relationship_id: self.id.clone(),
                percentage: self.direct_pct,
            });
        }
        Ok(())
    }
}

/// Edge data stored on petgraph edges.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub direct_pct: f64,
    /// Method recorded on the relationship, or the suggestion for its stake.
    pub method: ConsolidationMethod,
}

impl From<&OwnershipRelationship> for EdgeData {
    fn from(r: &OwnershipRelationship) -> Self {
        Self {
            direct_pct: r.direct_pct,
            method: r.method(),
        }
    }
}
