//! Per-call execution policy.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Flat option object accepted from callers. Missing keys take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    pub include_warnings: bool,
    pub include_info: bool,
    /// Stop after the first rule that produces an ERROR.
    pub fail_fast: bool,
    /// Restricts the run to these rule ids when present.
    pub rule_filter: Option<BTreeSet<String>>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            include_warnings: true,
            include_info: false,
            fail_fast: false,
            rule_filter: None,
        }
    }
}

impl ValidationOptions {
    pub fn with_rules<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_filter = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn fail_fast(mut self, on: bool) -> Self {
        self.fail_fast = on;
        self
    }

    pub fn include_info(mut self, on: bool) -> Self {
        self.include_info = on;
        self
    }

    pub fn include_warnings(mut self, on: bool) -> Self {
        self.include_warnings = on;
        self
    }

    /// Whether a rule passes the filter. No filter admits every rule.
    pub fn admits(&self, rule_id: &str) -> bool {
        self.rule_filter.as_ref().map_or(true, |f| f.contains(rule_id))
    }
}
