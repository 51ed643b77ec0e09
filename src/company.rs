//! Core entity types for the consolidation engine.
//!
//! Companies are the nodes of every ownership graph. Each one is identified by
//! a [`CompanyId`] and described by [`Company`]. Classifications
//! ([`HierarchyClassification`]) partition relationships into independent
//! ownership views.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Unique identifier of a company, as assigned by the setup layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CompanyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for CompanyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a hierarchy classification (legal, regional, tax, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationId(String);

impl ClassificationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClassificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassificationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClassificationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Descriptive position of a company within its group.
///
/// Only `UltimateParent` has algorithmic meaning: it is the fallback root
/// when a classification has no company that is a parent without also being
/// a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyType {
    UltimateParent,
    Intermediate,
    #[default]
    Subsidiary,
}

impl std::fmt::Display for CompanyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyType::UltimateParent => write!(f, "ultimate-parent"),
            CompanyType::Intermediate => write!(f, "intermediate"),
            CompanyType::Subsidiary => write!(f, "subsidiary"),
        }
    }
}

/// A corporate entity. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Statutory registration number, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "type", default)]
    pub company_type: CompanyType,
}

impl Company {
    /// Create a company with no registration number or country.
    pub fn new(id: impl Into<CompanyId>, name: impl Into<String>, company_type: CompanyType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            registration_number: None,
            country: String::new(),
            company_type,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn is_ultimate_parent(&self) -> bool {
        self.company_type == CompanyType::UltimateParent
    }
}

/// A named ownership view. Edges of different classifications are never
/// combined in one traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyClassification {
    pub id: ClassificationId,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl HierarchyClassification {
    pub fn new(id: impl Into<ClassificationId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
        }
    }
}
