//! Relationship and snapshot validation.
//!
//! [`validate_relationship`] is the gate the setup layer calls before saving a
//! relationship. [`validate_snapshot`] sweeps a whole snapshot and collects
//! every finding instead of stopping at the first one, so the data-quality
//! panel can list them all.

use std::collections::HashSet;

use serde::Serialize;

use crate::company::CompanyId;
use crate::error::ValidationError;
use crate::graph::OwnershipRelationship;
use crate::snapshot::Snapshot;

/// Check one relationship against the snapshot it is about to join.
pub fn validate_relationship(
    rel: &OwnershipRelationship,
    snapshot: &Snapshot,
) -> Result<(), ValidationError> {
    rel.check_shape()?;

    if snapshot.classification(rel.classification_id.as_str()).is_none() {
        return Err(ValidationError::UnknownClassification {
            relationship_id: rel.id.clone(),
            classification_id: rel.classification_id.to_string(),
        });
    }
    for (role, id) in [("parent", &rel.parent_id), ("child", &rel.child_id)] {
        if snapshot.company(id.as_str()).is_none() {
            return Err(ValidationError::UnknownCompany {
                relationship_id: rel.id.clone(),
                company_id: id.to_string(),
                role,
            });
        }
    }
    Ok(())
}

/// Every finding of a snapshot sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    #[serde(serialize_with = "serialize_errors")]
    pub issues: Vec<ValidationError>,
}

#[allow(clippy::ptr_arg)]
fn serialize_errors<S: serde::Serializer>(
    issues: &Vec<ValidationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(issues.iter().map(|e| e.to_string()))
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Sweep a snapshot: duplicate companies, per-relationship checks, and
/// duplicate parent→child edges within a classification.
pub fn validate_snapshot(snapshot: &Snapshot) -> ValidationReport {
    let mut issues = Vec::new();

    let mut seen_companies: HashSet<&CompanyId> = HashSet::new();
    for company in &snapshot.companies {
        if !seen_companies.insert(&company.id) {
            issues.push(ValidationError::DuplicateCompany {
                company_id: company.id.to_string(),
            });
        }
    }

    let mut seen_edges = HashSet::new();
    for rel in &snapshot.relationships {
        if let Err(e) = validate_relationship(rel, snapshot) {
            issues.push(e);
            continue;
        }
        let key = (&rel.classification_id, &rel.parent_id, &rel.child_id);
        if !seen_edges.insert(key) {
            issues.push(ValidationError::DuplicateEdge {
                classification_id: rel.classification_id.to_string(),
                parent_id: rel.parent_id.to_string(),
                child_id: rel.child_id.to_string(),
            });
        }
    }

    if !issues.is_empty() {
        tracing::info!(count = issues.len(), "snapshot has data-quality issues");
    }
    ValidationReport { issues }
}
