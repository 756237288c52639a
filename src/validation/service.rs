//! The engine's public entry points.
use super::issue::Category;
use super::options::ValidationOptions;
use super::registry::RuleRegistry;
use super::report::ValidationReport;
use super::rule::RuleDescriptor;
use super::validator::Validator;
use crate::analysis::load_path::{self, LoadImpactReport};
use crate::config::{validate_config, EngineConfig};
use crate::error::EngineError;
use crate::snapshot::{HarnessIndex, Project, ProjectSource};
use std::sync::Arc;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Validates harness snapshots fetched from a [`ProjectSource`].
///
/// Holds no per-run state; one service can serve concurrent callers.
pub struct ValidationService {
    registry: RuleRegistry,
    source: Arc<dyn ProjectSource>,
    config: EngineConfig,
}

impl ValidationService {
    pub fn new(
        registry: RuleRegistry,
        source: Arc<dyn ProjectSource>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        validate_config(&config)?;
        Ok(Self { registry, source, config })
    }

    /// A service running every built-in rule with default configuration.
    pub fn with_builtin_rules(source: Arc<dyn ProjectSource>) -> Result<Self, EngineError> {
        Self::new(RuleRegistry::builtin()?, source, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Runs the active rules over the project's current snapshot.
    ///
    /// `None` options fall back to the configured defaults. A report with
    /// `valid == false` is still `Ok`.
    ///
    /// # Errors
    /// `ProjectNotFound` or `Source` when the snapshot cannot be loaded.
    pub fn validate_project(
        &self,
        project_id: &str,
        options: Option<ValidationOptions>,
    ) -> Result<ValidationReport, EngineError> {
        let project = self.fetch(project_id)?;
        let options = options.unwrap_or_else(|| self.config.default_options.clone());
        Ok(validate_snapshot(&self.registry, &project, &options, self.config.parallel))
    }

    /// Runs only the rules in `category`, further narrowed by any caller filter.
    pub fn validate_by_category(
        &self,
        project_id: &str,
        category: Category,
        options: Option<ValidationOptions>,
    ) -> Result<ValidationReport, EngineError> {
        let options = options.unwrap_or_else(|| self.config.default_options.clone());
        let options = self.registry.restrict_to_category(category, options);
        self.validate_project(project_id, Some(options))
    }

    pub fn list_rules(&self) -> Vec<RuleDescriptor> {
        self.registry.list()
    }

    pub fn list_rules_by_category(&self, category: Category) -> Vec<RuleDescriptor> {
        self.registry.by_category(category)
    }

    /// Traces a declared feature's load back to its supplying pin.
    pub fn assess_feature_load(
        &self,
        project_id: &str,
        feature_id: &str,
    ) -> Result<LoadImpactReport, EngineError> {
        let project = self.fetch(project_id)?;
        let index = HarnessIndex::build(&project);
        load_path::assess_feature(&index, feature_id, &self.config.load_path)
    }

    /// Traces `current` amps drawn at `load_pin_id` back to its supplying pin.
    pub fn assess_load(
        &self,
        project_id: &str,
        load_pin_id: &str,
        current: f64,
    ) -> Result<LoadImpactReport, EngineError> {
        let project = self.fetch(project_id)?;
        let index = HarnessIndex::build(&project);
        load_path::assess_load(&index, load_pin_id, current, &self.config.load_path)
    }

    fn fetch(&self, project_id: &str) -> Result<Project, EngineError> {
        self.source
            .fetch_project_snapshot(project_id, true)?
            .ok_or_else(|| EngineError::ProjectNotFound(project_id.to_string()))
    }
}

/// Validates an already loaded snapshot with the given registry.
pub fn validate_snapshot(
    registry: &RuleRegistry,
    project: &Project,
    options: &ValidationOptions,
    parallel: bool,
) -> ValidationReport {
    let started = Instant::now();
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();

    let index = HarnessIndex::build(project);
    let rules = registry.active(options);
    tracing::info!(project_id = %project.id, rules = rules.len(), parallel, "Validation started");

    let outcome = Validator::new(&index, options, rules).parallel(parallel).run();
    let duration_ms = started.elapsed().as_millis() as u64;
    let report = ValidationReport::new(
        &project.id,
        outcome.issues,
        outcome.rules_executed,
        outcome.halted_early,
        duration_ms,
        timestamp,
    );

    tracing::info!(
        project_id = %report.project_id,
        valid = report.valid,
        errors = report.error_count,
        warnings = report.warning_count,
        infos = report.info_count,
        halted_early = report.halted_early,
        duration_ms,
        "Validation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{connector, ecu, wire, ProjectBuilder, WireFixture};
    use crate::snapshot::InMemoryProjectSource;
    use crate::validation::issue::IssueCode;

    fn service() -> ValidationService {
        let project = ProjectBuilder::new("p1")
            .ecu(ecu("bcm").connector(connector("x1").pin_count(4).pins(&["a", "b", "c"])))
            .wire(wire("w1").awg(22).amps(3.5))
            .build();
        let source = InMemoryProjectSource::new().with_project(project);
        ValidationService::with_builtin_rules(Arc::new(source)).unwrap()
    }

    #[test]
    fn test_validate_project_end_to_end() {
        let report = service().validate_project("p1", None).unwrap();
        assert!(!report.valid);
        assert_eq!(report.rules_executed, 8);
        let codes: Vec<IssueCode> = report.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::WireOvercurrent, IssueCode::PinCountMismatch]);
        assert_eq!(report.issues[0].rule_id, "elec-wire-ampacity");
        assert!(report.timestamp.contains('T') && report.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_unknown_project_is_fatal() {
        let err = service().validate_project("missing", None).unwrap_err();
        assert!(matches!(err, EngineError::ProjectNotFound(id) if id == "missing"));
    }

    #[test]
    fn test_validate_by_category_intersects_filter() {
        let svc = service();
        let report = svc.validate_by_category("p1", Category::Physical, None).unwrap();
        assert_eq!(report.rules_executed, 4);
        assert!(report.issues.iter().all(|i| i.category == Category::Physical));

        let opts =
            ValidationOptions::default().with_rules(["elec-wire-ampacity", "phys-pin-count"]);
        let report = svc.validate_by_category("p1", Category::Physical, Some(opts)).unwrap();
        assert_eq!(report.rules_executed, 1);
        assert_eq!(report.issues[0].code, IssueCode::PinCountMismatch);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.load_path.max_voltage_drop_volts = -1.0;
        let result = ValidationService::new(
            RuleRegistry::builtin().unwrap(),
            Arc::new(InMemoryProjectSource::new()),
            config,
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
