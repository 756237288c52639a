//! The common contract every check implements.
use super::issue::{Category, Issue};
use super::options::ValidationOptions;
use crate::error::{EngineError, RuleError};
use crate::snapshot::{HarnessIndex, Project};
use serde::{Deserialize, Serialize};

/// Static metadata describing a rule, exposed for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    /// Globally unique kebab-case id, prefixed by category (e.g. `elec-wire-ampacity`).
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub enabled: bool,
}

impl RuleDescriptor {
    pub fn new(id: &str, name: &str, description: &str, category: Category) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Checks the basic shape of a descriptor before registration.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: &str| -> Result<(), EngineError> {
            Err(EngineError::InvalidRule { rule_id: self.id.clone(), reason: reason.to_string() })
        };
        if self.id.trim().is_empty() {
            return invalid("id is empty");
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return invalid("id must be kebab-case");
        }
        if self.name.trim().is_empty() {
            return invalid("name is empty");
        }
        Ok(())
    }
}

/// Everything a rule may read during one run.
pub struct ValidationContext<'a> {
    pub project: &'a Project,
    pub index: &'a HarnessIndex<'a>,
    pub options: &'a ValidationOptions,
}

impl<'a> ValidationContext<'a> {
    pub fn new(index: &'a HarnessIndex<'a>, options: &'a ValidationOptions) -> Self {
        Self { project: index.project(), index, options }
    }
}

/// A single self-contained check over a snapshot.
///
/// Implementations must be pure: no I/O, no interior mutation, and the same
/// context must always yield the same issues. Missing optional data means
/// "not applicable", never a fault.
pub trait Rule: Send + Sync {
    fn descriptor(&self) -> &RuleDescriptor;

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError>;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    fn category(&self) -> Category {
        self.descriptor().category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_validation() {
        let ok = RuleDescriptor::new("phys-pin-count", "Pin Count", "", Category::Physical);
        assert!(ok.validate().is_ok());
        assert!(ok.enabled);

        let bad = RuleDescriptor::new("Phys_Pin", "Pin Count", "", Category::Physical);
        let err = bad.validate().unwrap_err();
        assert!(matches!(&err, EngineError::InvalidRule { rule_id, .. } if rule_id == "Phys_Pin"));
        assert!(err.to_string().contains("kebab-case"));

        let unnamed = RuleDescriptor::new("x", " ", "", Category::Safety);
        assert!(unnamed.validate().is_err());
        assert!(!unnamed.disabled().enabled);
    }
}
