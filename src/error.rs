//! Rich diagnostic error types for the lookthrough engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know what
//! went wrong and how to fix it.
//!
//! Data-quality problems the engine can work around (cycles, dangling edges)
//! are *not* errors; they surface as warnings on the computation result.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the lookthrough engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LookthroughError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("relationship {relationship_id}: company {company_id} cannot own itself")]
    #[diagnostic(
        code(lookthrough::validation::self_ownership),
        help("Parent and child of an ownership relationship must be different companies.")
    )]
    SelfOwnership {
        relationship_id: String,
        company_id: String,
    },

    #[error("relationship {relationship_id}: ownership {percentage} is outside 0..=100")]
    #[diagnostic(
        code(lookthrough::validation::percentage_range),
        help("Direct ownership is a percentage; enter a value between 0 and 100 inclusive.")
    )]
    PercentageOutOfRange {
        relationship_id: String,
        percentage: f64,
    },

    #[error("relationship {relationship_id}: unknown {role} company {company_id}")]
    #[diagnostic(
        code(lookthrough::validation::unknown_company),
        help(
            "The relationship references a company that is not in the snapshot. \
             Create the company first, or remove the stale relationship."
        )
    )]
    UnknownCompany {
        relationship_id: String,
        company_id: String,
        role: &'static str,
    },

    #[error("relationship {relationship_id}: unknown classification {classification_id}")]
    #[diagnostic(
        code(lookthrough::validation::unknown_classification),
        help("Every relationship must belong to a hierarchy classification defined in the snapshot.")
    )]
    UnknownClassification {
        relationship_id: String,
        classification_id: String,
    },

    #[error("duplicate company id {company_id}")]
    #[diagnostic(
        code(lookthrough::validation::duplicate_company),
        help("Company identifiers must be unique; the later record shadows the earlier one.")
    )]
    DuplicateCompany { company_id: String },

    #[error("duplicate edge {parent_id} -> {child_id} in classification {classification_id}")]
    #[diagnostic(
        code(lookthrough::validation::duplicate_edge),
        help(
            "Two relationships link the same parent and child in one classification. \
             Both stakes are summed; merge them if they describe the same holding."
        )
    )]
    DuplicateEdge {
        classification_id: String,
        parent_id: String,
        child_id: String,
    },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("unknown classification: {classification_id}")]
    #[diagnostic(
        code(lookthrough::engine::unknown_classification),
        help(
            "The requested hierarchy classification is not defined in the snapshot. \
             List the snapshot's classifications and pass one of their ids."
        )
    )]
    UnknownClassification { classification_id: String },

    #[error("unknown root company: {company_id}")]
    #[diagnostic(
        code(lookthrough::engine::unknown_root),
        help("The root passed to an ownership query must be a company in the snapshot.")
    )]
    UnknownRoot { company_id: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(lookthrough::engine::invalid_config),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },
}

// ---------------------------------------------------------------------------
// Snapshot errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {path}")]
    #[diagnostic(
        code(lookthrough::snapshot::read),
        help("Ensure the snapshot file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {message}")]
    #[diagnostic(
        code(lookthrough::snapshot::parse),
        help(
            "The snapshot must be a JSON object with `companies`, `classifications` \
             and `relationships` arrays, as produced by the application export."
        )
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read engine config: {path}")]
    #[diagnostic(
        code(lookthrough::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse engine config {path}: {message}")]
    #[diagnostic(
        code(lookthrough::config::parse),
        help("Check the TOML syntax in the engine config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize engine config")]
    #[diagnostic(code(lookthrough::config::serialize))]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },

    #[error("failed to write engine config: {path}")]
    #[diagnostic(
        code(lookthrough::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning lookthrough results.
pub type LookthroughResult<T> = std::result::Result<T, LookthroughError>;
