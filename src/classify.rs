//! Consolidation classifier: ownership percentage → statutory treatment.
//!
//! The classifier only ever *suggests*. A method stored on a relationship by
//! a user is never replaced; the suggestion is used to default new
//! relationships and to annotate computed look-through figures.

use serde::{Deserialize, Serialize};

/// Statutory consolidation treatment implied by an ownership percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsolidationMethod {
    /// Control: line-by-line consolidation.
    Full,
    /// Significant influence: equity method.
    Equity,
    /// Investment only.
    None,
}

impl ConsolidationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsolidationMethod::Full => "FULL",
            ConsolidationMethod::Equity => "EQUITY",
            ConsolidationMethod::None => "NONE",
        }
    }
}

impl std::fmt::Display for ConsolidationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold pair driving [`ConsolidationThresholds::classify`].
///
/// `pct > full_above` is FULL, `equity_from <= pct <= full_above` is EQUITY,
/// anything below `equity_from` is NONE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationThresholds {
    #[serde(default = "default_full_above")]
    pub full_above: f64,
    #[serde(default = "default_equity_from")]
    pub equity_from: f64,
}

fn default_full_above() -> f64 {
    50.0
}

fn default_equity_from() -> f64 {
    20.0
}

impl Default for ConsolidationThresholds {
    fn default() -> Self {
        Self {
            full_above: default_full_above(),
            equity_from: default_equity_from(),
        }
    }
}

impl ConsolidationThresholds {
    /// Whether the pair is usable: finite and `equity_from <= full_above`.
    pub fn is_valid(&self) -> bool {
        self.full_above.is_finite()
            && self.equity_from.is_finite()
            && self.equity_from <= self.full_above
    }

    pub fn classify(&self, percentage: f64) -> ConsolidationMethod {
        if percentage > self.full_above {
            ConsolidationMethod::Full
        } else if percentage >= self.equity_from {
            ConsolidationMethod::Equity
        } else {
            // NaN lands here too.
            ConsolidationMethod::None
        }
    }
}

/// Suggest a method using the standard 50% / 20% thresholds.
pub fn suggest_method(percentage: f64) -> ConsolidationMethod {
    ConsolidationThresholds::default().classify(percentage)
}
