//! ECU supply budget: power drawn by sourced wires against the derated rating.
use crate::error::RuleError;
use crate::validation::issue::{
    round2, Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};
use serde_json::json;

/// Usable share of an ECU's rated supply.
const SUPPLY_DERATING: f64 = 0.8;
const HIGH_UTILIZATION: f64 = 0.9;

pub struct PowerBudgetRule {
    descriptor: RuleDescriptor,
}

impl PowerBudgetRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "elec-power-budget",
                "Power Budget",
                "Checks that the power sourced through an ECU's pins stays within its derated supply rating.",
                Category::Electrical,
            ),
        }
    }
}

impl Default for PowerBudgetRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for PowerBudgetRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for ecu in &ctx.project.ecus {
            let Some(max_power) = ecu.max_power() else {
                continue;
            };
            let available = max_power * SUPPLY_DERATING;

            // Only wires leaving the ECU count toward its load.
            let mut total = 0.0;
            let mut contributions = Vec::new();
            for connector in &ecu.connectors {
                for pin in &connector.pins {
                    for wire in ctx.index.wires_from(&pin.id) {
                        let (Some(voltage), Some(current)) = (wire.voltage(), wire.max_current())
                        else {
                            continue;
                        };
                        let power = voltage * current;
                        total += power;
                        contributions.push(json!({
                            "wireId": wire.id,
                            "voltage": voltage,
                            "current": current,
                            "power": power,
                        }));
                    }
                }
            }

            // A zero rating has no utilization band, only the hard limit.
            let utilization = (available > 0.0).then(|| total / available);

            let issue = if total > available {
                Issue::new(
                    IssueCode::PowerBudgetExceeded,
                    Severity::Error,
                    Category::Electrical,
                    EntityType::Ecu,
                    &ecu.id,
                    format!(
                        "ECU '{}' sources {:.1}W but only {:.1}W is available after derating",
                        ecu.name, total, available
                    ),
                )
                .with_fix(
                    SuggestedFix::new(FixAction::ReduceLoad)
                        .param("currentLoad", total)
                        .param("targetLoad", available)
                        .param("excess", total - available),
                )
            } else if let Some(utilization) = utilization.filter(|u| *u >= HIGH_UTILIZATION) {
                Issue::new(
                    IssueCode::PowerBudgetHigh,
                    Severity::Warning,
                    Category::Electrical,
                    EntityType::Ecu,
                    &ecu.id,
                    format!(
                        "ECU '{}' is at {:.1}% of its available power budget",
                        ecu.name,
                        utilization * 100.0
                    ),
                )
            } else {
                continue;
            };

            let mut issue = issue
                .with("maxPower", max_power)
                .with("availablePower", available)
                .with("totalPower", total);
            if let Some(utilization) = utilization {
                issue = issue.with("utilizationPercent", round2(utilization * 100.0));
            }
            issues.push(issue.with("contributions", contributions));
        }

        Ok(issues)
    }
}
