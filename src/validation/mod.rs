//! The rule engine for harness snapshots.
//!
//! This module provides the `ValidationService`, which acts as a design-review
//! gate for a harness. It runs a registry of engineering rules against a
//! read-only snapshot and collects every finding into a `ValidationReport`
//! instead of stopping at the first one.

// Publicly export the primary components for use by other modules.
pub use self::issue::{Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix};
pub use self::options::ValidationOptions;
pub use self::registry::RuleRegistry;
pub use self::report::ValidationReport;
pub use self::rule::{Rule, RuleDescriptor, ValidationContext};
pub use self::service::{validate_snapshot, ValidationService};
pub use self::validator::{RunOutcome, Validator};

// --- MODULE DECLARATIONS ---
pub mod issue;
pub mod options;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;
pub mod service;
mod validator;
