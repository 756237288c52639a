//! Connector pin inventory: declared count, numbering and usage.
use crate::error::RuleError;
use crate::validation::issue::{
    Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};
use std::collections::HashSet;

pub struct PinCountRule {
    descriptor: RuleDescriptor,
}

impl PinCountRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "phys-pin-count",
                "Pin Count",
                "Checks declared pin counts, duplicate pin numbers and unused pins on each connector.",
                Category::Physical,
            ),
        }
    }
}

impl Default for PinCountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for PinCountRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for ecu in &ctx.project.ecus {
            for connector in &ecu.connectors {
                let actual = connector.pins.len() as u32;

                if let Some(declared) = connector.pin_count {
                    if actual < declared {
                        let missing = declared - actual;
                        issues.push(
                            Issue::new(
                                IssueCode::PinCountMismatch,
                                Severity::Error,
                                Category::Physical,
                                EntityType::Connector,
                                &connector.id,
                                format!(
                                    "Connector '{}' declares {} pins but only {} are defined",
                                    connector.name, declared, actual
                                ),
                            )
                            .with("declaredPins", declared)
                            .with("actualPins", actual)
                            .with("missingPins", missing)
                            .with_fix(
                                SuggestedFix::new(FixAction::AddPins).param("count", missing),
                            ),
                        );
                    } else if actual > declared {
                        issues.push(
                            Issue::new(
                                IssueCode::PinCountMismatch,
                                Severity::Warning,
                                Category::Physical,
                                EntityType::Connector,
                                &connector.id,
                                format!(
                                    "Connector '{}' declares {} pins but {} are defined",
                                    connector.name, declared, actual
                                ),
                            )
                            .with("declaredPins", declared)
                            .with("actualPins", actual)
                            .with("extraPins", actual - declared)
                            .with_fix(
                                SuggestedFix::new(FixAction::UpdatePinCount)
                                    .param("pinCount", actual),
                            ),
                        );
                    }
                }

                let mut seen = HashSet::new();
                let mut duplicates: Vec<&str> = Vec::new();
                for pin in &connector.pins {
                    let number = pin.pin_number.as_str();
                    if !seen.insert(number) && !duplicates.contains(&number) {
                        duplicates.push(number);
                    }
                }
                if !duplicates.is_empty() {
                    issues.push(
                        Issue::new(
                            IssueCode::DuplicatePinNumbers,
                            Severity::Error,
                            Category::Physical,
                            EntityType::Connector,
                            &connector.id,
                            format!(
                                "Connector '{}' reuses pin numbers: {}",
                                connector.name,
                                duplicates.join(", ")
                            ),
                        )
                        .with("duplicates", duplicates.clone())
                        .with_fix(
                            SuggestedFix::new(FixAction::RenumberPins)
                                .param("pinNumbers", duplicates),
                        ),
                    );
                }

                if ctx.options.include_info {
                    let unconnected: Vec<&str> = connector
                        .pins
                        .iter()
                        .filter(|p| !ctx.index.is_connected(&p.id))
                        .map(|p| p.pin_number.as_str())
                        .collect();
                    if !unconnected.is_empty() {
                        issues.push(
                            Issue::new(
                                IssueCode::UnconnectedPins,
                                Severity::Info,
                                Category::Physical,
                                EntityType::Connector,
                                &connector.id,
                                format!(
                                    "Connector '{}' has {} unconnected pin(s)",
                                    connector.name,
                                    unconnected.len()
                                ),
                            )
                            .with("count", unconnected.len())
                            .with("pinNumbers", unconnected),
                        );
                    }
                }
            }
        }

        Ok(issues)
    }
}
