//! Wire ampacity: current carried versus the derated gauge rating.
use crate::error::RuleError;
use crate::reference::{self, DERATING_FACTOR};
use crate::validation::issue::{
    round2, Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

/// Utilization at or above this share of the derated rating draws a warning.
const HIGH_UTILIZATION: f64 = 0.9;

pub struct WireAmpacityRule {
    descriptor: RuleDescriptor,
}

impl WireAmpacityRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "elec-wire-ampacity",
                "Wire Ampacity",
                "Checks that each wire's current stays within the derated ampacity of its gauge.",
                Category::Electrical,
            ),
        }
    }
}

impl Default for WireAmpacityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for WireAmpacityRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for wire in &ctx.project.wires {
            let (Some(gauge), Some(current)) = (wire.gauge(), wire.max_current()) else {
                continue;
            };

            let Some(ampacity) = reference::ampacity(gauge) else {
                issues.push(
                    Issue::new(
                        IssueCode::WireUnknownGauge,
                        Severity::Warning,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' uses AWG {} which has no ampacity data",
                            wire.label(),
                            gauge
                        ),
                    )
                    .with("gauge", gauge),
                );
                continue;
            };

            let derated = ampacity * DERATING_FACTOR;
            let utilization = if derated > 0.0 { current / derated } else { f64::INFINITY };

            if current > derated {
                let recommended = reference::recommended_gauge_for_current(current);
                issues.push(
                    Issue::new(
                        IssueCode::WireOvercurrent,
                        Severity::Error,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' carries {:.2}A but AWG {} is rated for {:.2}A after derating",
                            wire.label(),
                            current,
                            gauge,
                            derated
                        ),
                    )
                    .with("gauge", gauge)
                    .with("current", current)
                    .with("ampacity", ampacity)
                    .with("deratedAmpacity", derated)
                    .with("utilizationPercent", round2(utilization * 100.0))
                    .with_fix(
                        SuggestedFix::new(FixAction::IncreaseWireGauge)
                            .param("currentGauge", gauge)
                            .param("recommendedGauge", recommended),
                    ),
                );
            } else if current >= HIGH_UTILIZATION * derated && current < derated {
                issues.push(
                    Issue::new(
                        IssueCode::WireHighUtilization,
                        Severity::Warning,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' runs at {:.1}% of its derated ampacity",
                            wire.label(),
                            utilization * 100.0
                        ),
                    )
                    .with("gauge", gauge)
                    .with("current", current)
                    .with("deratedAmpacity", derated)
                    .with("utilizationPercent", round2(utilization * 100.0)),
                );
            }
        }

        Ok(issues)
    }
}
