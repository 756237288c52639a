//! Defines the error types for the engine and its collaborators.
//!
//! Engineering violations are not errors: they are `Issue` values in a report.
//! The types here cover the two other failure classes, fatal run errors that
//! abort a call before any rule executes, and rule faults that the
//! orchestrator isolates.
use thiserror::Error;

/// A fatal error for one engine call. The caller never receives a partial
/// report alongside one of these.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Snapshot source failed: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid rule descriptor '{rule_id}': {reason}")]
    InvalidRule { rule_id: String, reason: String },
    #[error("Rule id registered twice: {0}")]
    DuplicateRule(String),
    #[error("Feature '{feature_id}' not found in project '{project_id}'")]
    FeatureNotFound { project_id: String, feature_id: String },
    #[error("Feature '{feature_id}' cannot be assessed: {reason}")]
    FeatureIncomplete { feature_id: String, reason: String },
    #[error("Pin '{pin_id}' not found in project '{project_id}'")]
    PinNotFound { project_id: String, pin_id: String },
}

/// An unexpected failure inside a single rule.
///
/// The orchestrator logs these and drops the rule's contribution; they never
/// surface in a report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Internal rule error: {0}")]
    Internal(String),
    #[error("Rule panicked: {0}")]
    Panicked(String),
}

/// Failure reported by a `ProjectSource` while loading a snapshot.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
