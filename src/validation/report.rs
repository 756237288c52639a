//! The aggregate outcome of one validation run.
use super::issue::{Issue, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub project_id: String,
    /// True iff no ERROR issue is present.
    pub valid: bool,
    /// Issues in rule execution order.
    pub issues: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub duration_ms: u64,
    pub rules_executed: usize,
    /// Set when fail-fast stopped the run before every active rule executed.
    pub halted_early: bool,
}

impl ValidationReport {
    /// Builds a report, deriving `valid` and the counts from `issues`.
    pub fn new(
        project_id: &str,
        issues: Vec<Issue>,
        rules_executed: usize,
        halted_early: bool,
        duration_ms: u64,
        timestamp: String,
    ) -> Self {
        let count = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
        let error_count = count(Severity::Error);
        let warning_count = count(Severity::Warning);
        let info_count = count(Severity::Info);
        Self {
            project_id: project_id.to_string(),
            valid: error_count == 0,
            issues,
            error_count,
            warning_count,
            info_count,
            timestamp,
            duration_ms,
            rules_executed,
            halted_early,
        }
    }

    /// Issues ranked ERROR, WARNING, INFO. Order within a rank is preserved.
    pub fn issues_by_severity(&self) -> Vec<&Issue> {
        let mut ranked: Vec<&Issue> = self.issues.iter().collect();
        ranked.sort_by_key(|i| i.severity);
        ranked
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::issue::{Category, EntityType, IssueCode};

    fn issue(code: IssueCode, severity: Severity) -> Issue {
        Issue::new(code, severity, Category::Physical, EntityType::Connector, "c1", "msg")
    }

    #[test]
    fn test_counts_and_validity() {
        let report = ValidationReport::new(
            "p1",
            vec![
                issue(IssueCode::UnconnectedPins, Severity::Info),
                issue(IssueCode::PinCountMismatch, Severity::Warning),
            ],
            8,
            false,
            3,
            "2024-01-01T00:00:00Z".into(),
        );
        assert!(report.valid);
        assert_eq!((report.error_count, report.warning_count, report.info_count), (0, 1, 1));

        let missing = vec![issue(IssueCode::MissingIpRating, Severity::Error)];
        let report = ValidationReport::new("p1", missing, 8, false, 3, String::new());
        assert!(!report.valid);
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_issues_by_severity_is_stable() {
        let report = ValidationReport::new(
            "p1",
            vec![
                issue(IssueCode::UnconnectedPins, Severity::Info),
                issue(IssueCode::PinCountMismatch, Severity::Warning),
                issue(IssueCode::DuplicatePinNumbers, Severity::Error),
                issue(IssueCode::UnknownEnvironment, Severity::Warning),
                issue(IssueCode::MissingIpRating, Severity::Error),
            ],
            8,
            false,
            0,
            String::new(),
        );
        let codes: Vec<IssueCode> = report.issues_by_severity().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::DuplicatePinNumbers,
                IssueCode::MissingIpRating,
                IssueCode::PinCountMismatch,
                IssueCode::UnknownEnvironment,
                IssueCode::UnconnectedPins,
            ]
        );
        // Execution order is untouched.
        assert_eq!(report.issues[0].code, IssueCode::UnconnectedPins);
    }

    #[test]
    fn test_json_is_camel_case() {
        let missing = vec![issue(IssueCode::MissingIpRating, Severity::Error)];
        let report = ValidationReport::new("p1", missing, 8, true, 12, "t".into());
        let v: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(v["projectId"], "p1");
        assert_eq!(v["rulesExecuted"], 8);
        assert_eq!(v["haltedEarly"], true);
        assert_eq!(v["durationMs"], 12);
        assert_eq!(v["errorCount"], 1);
        assert_eq!(v["valid"], false);
        assert_eq!(v["issues"][0]["code"], "MISSING_IP_RATING");
        assert_eq!(v["issues"][0]["entityId"], "c1");
    }
}
