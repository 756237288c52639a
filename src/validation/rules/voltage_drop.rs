//! Resistive voltage drop along a wire run.
use crate::error::RuleError;
use crate::reference;
use crate::snapshot::WireType;
use crate::validation::issue::{
    round2, Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

/// Share of the limit above which a drop is reported as high.
const HIGH_DROP_SHARE: f64 = 0.8;

/// Allowed drop, as a percentage of the wire voltage.
pub fn drop_limit_percent(wire_type: Option<WireType>) -> f64 {
    match wire_type {
        Some(WireType::Power) => 3.0,
        Some(WireType::Ground) => 2.0,
        Some(WireType::Signal) | None => 5.0,
    }
}

/// Power circuits are counted out and back.
fn path_multiplier(wire_type: Option<WireType>) -> f64 {
    if wire_type == Some(WireType::Power) {
        2.0
    } else {
        1.0
    }
}

/// Volts lost over `length` meters of `awg` wire at `current` amps.
/// `None` for gauges with no resistance data.
pub fn voltage_drop(
    awg: u32,
    length: f64,
    current: f64,
    wire_type: Option<WireType>,
) -> Option<f64> {
    let rpm = reference::resistance_per_meter(awg)?;
    Some(current * rpm * length * path_multiplier(wire_type))
}

fn usable(x: f64) -> bool {
    x.is_finite() && x != 0.0
}

pub struct VoltageDropRule {
    descriptor: RuleDescriptor,
}

impl VoltageDropRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "elec-voltage-drop",
                "Voltage Drop",
                "Checks the resistive voltage drop of each wire against the limit for its circuit type.",
                Category::Electrical,
            ),
        }
    }
}

impl Default for VoltageDropRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for VoltageDropRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for wire in &ctx.project.wires {
            let (Some(gauge), Some(length), Some(current), Some(voltage)) =
                (wire.gauge(), wire.length(), wire.max_current(), wire.voltage())
            else {
                continue;
            };
            if !(usable(length) && usable(current) && usable(voltage)) {
                continue;
            }
            let wire_type = wire.wire_type();
            let Some(drop) = voltage_drop(gauge, length, current, wire_type) else {
                continue;
            };
            let multiplier = path_multiplier(wire_type);
            let resistance = drop / current;
            let drop_percent = 100.0 * drop / voltage;
            let limit = drop_limit_percent(wire_type);
            let type_name = wire_type.map_or("SIGNAL", |t| t.as_str());

            if drop_percent > limit {
                let target_drop = voltage * limit / 100.0;
                let max_rpm = target_drop / (current * length * multiplier);
                let max_length = length * target_drop / drop;
                issues.push(
                    Issue::new(
                        IssueCode::VoltageDropExcessive,
                        Severity::Error,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' drops {:.3}V ({:.2}%), above the {}% limit for {} circuits",
                            wire.label(),
                            drop,
                            drop_percent,
                            limit,
                            type_name
                        ),
                    )
                    .with("gauge", gauge)
                    .with("length", length)
                    .with("current", current)
                    .with("voltage", voltage)
                    .with("resistance", resistance)
                    .with("voltageDrop", drop)
                    .with("dropPercent", round2(drop_percent))
                    .with("limitPercent", limit)
                    .with_fix(
                        SuggestedFix::new(FixAction::IncreaseWireGauge)
                            .param("currentGauge", gauge)
                            .param(
                                "recommendedGauge",
                                reference::recommended_gauge_for_resistance(max_rpm),
                            ),
                    )
                    .with_fix(
                        SuggestedFix::new(FixAction::ReduceWireLength)
                            .param("currentLength", length)
                            .param("maxLength", round2(max_length)),
                    ),
                );
            } else if drop_percent > HIGH_DROP_SHARE * limit {
                issues.push(
                    Issue::new(
                        IssueCode::VoltageDropHigh,
                        Severity::Warning,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' drops {:.2}%, close to the {}% limit",
                            wire.label(),
                            drop_percent,
                            limit
                        ),
                    )
                    .with("gauge", gauge)
                    .with("voltageDrop", drop)
                    .with("dropPercent", round2(drop_percent))
                    .with("limitPercent", limit),
                );
            }
        }

        Ok(issues)
    }
}
