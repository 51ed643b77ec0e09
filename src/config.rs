//! Engine configuration, persisted as TOML.
//!
//! ```toml
//! max_depth = 64
//! parallel_roots = true
//!
//! [thresholds]
//! full_above = 50.0
//! equity_from = 20.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::ConsolidationThresholds;
use crate::error::ConfigError;
use crate::graph::propagate::{PropagationConfig, DEFAULT_MAX_DEPTH};

/// Configuration for the consolidation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ceiling on ownership levels followed below a root.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Propagate the roots of a group query on the rayon pool.
    #[serde(default = "default_parallel_roots")]
    pub parallel_roots: bool,
    /// Classifier cut-offs used for suggestions on computed figures.
    #[serde(default)]
    pub thresholds: ConsolidationThresholds,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_parallel_roots() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            parallel_roots: default_parallel_roots(),
            thresholds: ConsolidationThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn propagation(&self) -> PropagationConfig {
        PropagationConfig {
            max_depth: self.max_depth,
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::Serialize { source })
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
