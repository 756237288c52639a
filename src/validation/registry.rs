//! The immutable, ordered set of rules a service runs.
use super::issue::Category;
use super::options::ValidationOptions;
use super::rule::{Rule, RuleDescriptor};
use super::rules::builtin_rules;
use crate::error::EngineError;
use std::collections::{BTreeSet, HashSet};

/// Rules keyed by id, kept in registration order.
///
/// Built once and never mutated, so it can be shared across threads.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Registers `rules` in the given order.
    ///
    /// # Errors
    /// `DuplicateRule` if two rules share an id, `InvalidRule` if a
    /// descriptor is malformed.
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            rule.descriptor().validate()?;
            if !seen.insert(rule.id().to_string()) {
                return Err(EngineError::DuplicateRule(rule.id().to_string()));
            }
        }
        Ok(Self { rules })
    }

    /// The registry holding every built-in rule.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::new(builtin_rules())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == rule_id).map(|r| r.as_ref())
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.get(rule_id).is_some()
    }

    pub fn list(&self) -> Vec<RuleDescriptor> {
        self.rules.iter().map(|r| r.descriptor().clone()).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<RuleDescriptor> {
        self.rules
            .iter()
            .filter(|r| r.category() == category)
            .map(|r| r.descriptor().clone())
            .collect()
    }

    /// Narrows `options` to the rules in `category`, intersected with any
    /// filter the options already carry.
    pub fn restrict_to_category(
        &self,
        category: Category,
        mut options: ValidationOptions,
    ) -> ValidationOptions {
        let in_category: BTreeSet<String> = self
            .rules
            .iter()
            .filter(|r| r.category() == category)
            .map(|r| r.id().to_string())
            .collect();
        let filter = match options.rule_filter.take() {
            Some(requested) => in_category.intersection(&requested).cloned().collect(),
            None => in_category,
        };
        options.rule_filter = Some(filter);
        options
    }

    /// Enabled rules admitted by the options' filter, in registration order.
    /// Filter ids that match no registered rule are logged and ignored.
    pub fn active(&self, options: &ValidationOptions) -> Vec<&dyn Rule> {
        if let Some(filter) = &options.rule_filter {
            for id in filter.iter().filter(|id| !self.contains(id)) {
                tracing::warn!(rule_id = %id, "Rule filter names an unregistered rule; ignoring");
            }
        }
        self.rules
            .iter()
            .filter(|r| r.descriptor().enabled && options.admits(r.id()))
            .map(|r| r.as_ref())
            .collect()
    }
}
