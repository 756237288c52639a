//! The central validator that orchestrates the execution of all validation rules.
use super::issue::{Issue, Severity};
use super::options::ValidationOptions;
use super::rule::{Rule, ValidationContext};
use crate::error::RuleError;
use crate::snapshot::HarnessIndex;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Issues and bookkeeping from one pass over the active rules.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub issues: Vec<Issue>,
    pub rules_executed: usize,
    pub halted_early: bool,
}

/// Runs a set of rules against one indexed snapshot.
///
/// Rules are applied in the order given. Faults inside a rule (an `Err` or a
/// panic) are logged and cost only that rule's contribution, like a linter
/// that keeps going after one check breaks.
pub struct Validator<'a> {
    index: &'a HarnessIndex<'a>,
    options: &'a ValidationOptions,
    rules: Vec<&'a dyn Rule>,
    parallel: bool,
}

impl<'a> Validator<'a> {
    pub fn new(
        index: &'a HarnessIndex<'a>,
        options: &'a ValidationOptions,
        rules: Vec<&'a dyn Rule>,
    ) -> Self {
        Self { index, options, rules, parallel: false }
    }

    /// Evaluates rules on the rayon pool. The outcome is identical to a
    /// sequential run.
    pub fn parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    pub fn run(&self) -> RunOutcome {
        let ctx = ValidationContext::new(self.index, self.options);

        if !self.parallel {
            let mut outcome = RunOutcome::default();
            for rule in &self.rules {
                let issues = self.execute(*rule, &ctx);
                if self.fold(&mut outcome, issues) {
                    break;
                }
            }
            outcome.halted_early = outcome.rules_executed < self.rules.len();
            return outcome;
        }

        // Every rule runs; fail-fast is applied while folding in order.
        let results: Vec<Vec<Issue>> =
            self.rules.par_iter().map(|rule| self.execute(*rule, &ctx)).collect();
        let mut outcome = RunOutcome::default();
        for issues in results {
            if self.fold(&mut outcome, issues) {
                break;
            }
        }
        outcome.halted_early = outcome.rules_executed < self.rules.len();
        outcome
    }

    /// Appends one rule's kept issues. Returns true when the run should stop.
    fn fold(&self, outcome: &mut RunOutcome, issues: Vec<Issue>) -> bool {
        outcome.rules_executed += 1;
        let produced_error = issues.iter().any(Issue::is_error);
        outcome.issues.extend(issues);
        self.options.fail_fast && produced_error
    }

    /// Runs one rule in isolation and applies the severity filter.
    fn execute(&self, rule: &dyn Rule, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let started = Instant::now();
        let result = match catch_unwind(AssertUnwindSafe(|| rule.validate(ctx))) {
            Ok(result) => result,
            Err(payload) => Err(RuleError::Panicked(panic_message(payload.as_ref()))),
        };

        match result {
            Ok(issues) => {
                let issues: Vec<Issue> = issues
                    .into_iter()
                    .filter(|i| self.keeps(i.severity))
                    .map(|mut i| {
                        i.rule_id = rule.id().to_string();
                        i
                    })
                    .collect();
                tracing::debug!(
                    rule_id = rule.id(),
                    issues = issues.len(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Rule finished"
                );
                issues
            }
            Err(e) => {
                tracing::error!(
                    rule_id = rule.id(),
                    project_id = %ctx.project.id,
                    error = %e,
                    "Rule failed; its issues are dropped"
                );
                Vec::new()
            }
        }
    }

    fn keeps(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => true,
            Severity::Warning => self.options.include_warnings,
            Severity::Info => self.options.include_info,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::ProjectBuilder;
    use crate::validation::issue::{Category, EntityType, IssueCode};
    use crate::validation::rule::RuleDescriptor;

    enum Behavior {
        Emit(Vec<Severity>),
        Fail,
        Panic,
    }

    struct Scripted {
        descriptor: RuleDescriptor,
        behavior: Behavior,
    }

    fn scripted(id: &str, behavior: Behavior) -> Scripted {
        Scripted { descriptor: RuleDescriptor::new(id, id, "", Category::Safety), behavior }
    }

    impl Rule for Scripted {
        fn descriptor(&self) -> &RuleDescriptor {
            &self.descriptor
        }

        fn validate(&self, _ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
            match &self.behavior {
                Behavior::Emit(severities) => Ok(severities
                    .iter()
                    .map(|&s| {
                        Issue::new(
                            IssueCode::PinCountMismatch,
                            s,
                            Category::Safety,
                            EntityType::Project,
                            "p",
                            "x",
                        )
                    })
                    .collect()),
                Behavior::Fail => Err(RuleError::Internal("boom".into())),
                Behavior::Panic => panic!("rule exploded"),
            }
        }
    }

    fn run(rules: &[Scripted], options: &ValidationOptions, parallel: bool) -> RunOutcome {
        let project = ProjectBuilder::new("p").build();
        let index = HarnessIndex::build(&project);
        let refs: Vec<&dyn Rule> = rules.iter().map(|r| r as &dyn Rule).collect();
        Validator::new(&index, options, refs).parallel(parallel).run()
    }

    fn ids(outcome: &RunOutcome) -> Vec<&str> {
        outcome.issues.iter().map(|i| i.rule_id.as_str()).collect()
    }

    #[test]
    fn test_fail_fast_stops_after_first_error() {
        let rules = [
            scripted("r1", Behavior::Emit(vec![])),
            scripted("r2", Behavior::Emit(vec![Severity::Error])),
            scripted("r3", Behavior::Emit(vec![Severity::Error])),
        ];
        let options = ValidationOptions::default().fail_fast(true);
        for parallel in [false, true] {
            let outcome = run(&rules, &options, parallel);
            assert_eq!(ids(&outcome), vec!["r2"]);
            assert_eq!(outcome.rules_executed, 2);
            assert!(outcome.halted_early);
        }

        let outcome = run(&rules, &ValidationOptions::default(), false);
        assert_eq!(ids(&outcome), vec!["r2", "r3"]);
        assert!(!outcome.halted_early);
    }

    #[test]
    fn test_severity_filter_never_drops_errors() {
        let all = vec![Severity::Info, Severity::Warning, Severity::Error];
        let rules = [scripted("r1", Behavior::Emit(all))];

        let outcome = run(&rules, &ValidationOptions::default(), false);
        let sev: Vec<Severity> = outcome.issues.iter().map(|i| i.severity).collect();
        assert_eq!(sev, vec![Severity::Warning, Severity::Error]);

        let quiet = ValidationOptions::default().include_warnings(false);
        assert_eq!(run(&rules, &quiet, false).issues.len(), 1);

        let verbose = ValidationOptions::default().include_info(true);
        assert_eq!(run(&rules, &verbose, false).issues.len(), 3);
    }

    #[test]
    fn test_faulting_rules_are_isolated() {
        let rules = [
            scripted("r1", Behavior::Fail),
            scripted("r2", Behavior::Panic),
            scripted("r3", Behavior::Emit(vec![Severity::Warning])),
        ];
        for parallel in [false, true] {
            let outcome = run(&rules, &ValidationOptions::default(), parallel);
            assert_eq!(ids(&outcome), vec!["r3"]);
            assert_eq!(outcome.rules_executed, 3);
        }
    }
}
