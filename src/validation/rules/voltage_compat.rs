//! Voltage agreement between a wire and the pins it joins.
use crate::error::RuleError;
use crate::validation::issue::{round2, Category, EntityType, Issue, IssueCode, Severity};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

/// Maximum relative difference, against the mean, for two voltages to agree.
pub const VOLTAGE_TOLERANCE: f64 = 0.10;

/// Two nominal voltages agree when they differ by at most 10% of their mean.
/// Equal values always agree; a zero mean with unequal values never does.
pub fn voltages_compatible(v1: f64, v2: f64) -> bool {
    if v1 == v2 {
        return true;
    }
    let mean = (v1 + v2) / 2.0;
    if mean == 0.0 {
        return false;
    }
    (v1 - v2).abs() / mean.abs() <= VOLTAGE_TOLERANCE
}

fn relative_difference_percent(v1: f64, v2: f64) -> f64 {
    let mean = ((v1 + v2) / 2.0).abs();
    if mean == 0.0 {
        return 0.0;
    }
    round2((v1 - v2).abs() / mean * 100.0)
}

pub struct VoltageCompatibilityRule {
    descriptor: RuleDescriptor,
}

impl VoltageCompatibilityRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "elec-voltage-compatibility",
                "Voltage Compatibility",
                "Checks that a wire's voltage agrees with the nominal voltage of both pins it connects.",
                Category::Electrical,
            ),
        }
    }
}

impl Default for VoltageCompatibilityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for VoltageCompatibilityRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for wire in &ctx.project.wires {
            if wire.electrical.is_none() {
                continue;
            }
            let (Some(src), Some(dst)) = (ctx.index.source(wire), ctx.index.destination(wire))
            else {
                continue;
            };

            let wire_v = wire.voltage();
            let src_v = src.pin.nominal_voltage();
            let dst_v = dst.pin.nominal_voltage();

            let pairs = [
                (IssueCode::VoltageMismatchSource, wire_v, src_v, "wire", "source pin"),
                (IssueCode::VoltageMismatchDest, wire_v, dst_v, "wire", "destination pin"),
                (IssueCode::VoltageMismatchPins, src_v, dst_v, "source pin", "destination pin"),
            ];

            for (code, a, b, a_name, b_name) in pairs {
                let (Some(a), Some(b)) = (a, b) else { continue };
                if voltages_compatible(a, b) {
                    continue;
                }
                issues.push(
                    Issue::new(
                        code,
                        Severity::Error,
                        Category::Electrical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}': {} at {}V does not match {} at {}V",
                            wire.label(),
                            a_name,
                            a,
                            b_name,
                            b
                        ),
                    )
                    .with("sourcePinId", src.pin.id.as_str())
                    .with("destPinId", dst.pin.id.as_str())
                    .with("voltageA", a)
                    .with("voltageB", b)
                    .with("differencePercent", relative_difference_percent(a, b))
                    .with("tolerancePercent", VOLTAGE_TOLERANCE * 100.0),
                );
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{
        connector, ecu, pin, pin_with_voltage, wire_between, ProjectBuilder, WireFixture,
    };
    use crate::snapshot::{HarnessIndex, Pin, Wire};
    use crate::validation::options::ValidationOptions;
    use rstest::rstest;

    fn run(src: Pin, dst: Pin, w: Wire) -> Vec<Issue> {
        let project = ProjectBuilder::new("p")
            .ecu(ecu("a").connector(connector("ca").pin(src)))
            .ecu(ecu("b").connector(connector("cb").pin(dst)))
            .wire(w)
            .build();
        let index = HarnessIndex::build(&project);
        let options = ValidationOptions::default();
        VoltageCompatibilityRule::new().validate(&ValidationContext::new(&index, &options)).unwrap()
    }

    #[rstest]
    #[case(12.0, 12.0, true)]
    #[case(12.0, 13.2, true)] // ~9.5% of the mean
    #[case(12.0, 14.0, false)]
    #[case(5.0, 12.0, false)]
    #[case(0.0, 0.0, true)]
    #[case(1.0, -1.0, false)] // Zero mean
    fn test_voltages_compatible(#[case] v1: f64, #[case] v2: f64, #[case] expected: bool) {
        assert_eq!(voltages_compatible(v1, v2), expected);
    }

    #[test]
    fn test_all_agree_is_clean() {
        let issues = run(
            pin_with_voltage("s", 12.0),
            pin_with_voltage("d", 12.0),
            wire_between("w1", "s", "d").volts(12.0),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_counts_each_disagreeing_pair() {
        // Wire matches source; destination disagrees with both.
        let issues = run(
            pin_with_voltage("s", 12.0),
            pin_with_voltage("d", 5.0),
            wire_between("w1", "s", "d").volts(12.0),
        );
        let codes: Vec<IssueCode> = issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::VoltageMismatchDest, IssueCode::VoltageMismatchPins]);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
    }

    #[test]
    fn test_missing_values_skip_their_pairs() {
        // No wire voltage: only the pin pair is evaluated.
        let issues = run(
            pin_with_voltage("s", 12.0),
            pin_with_voltage("d", 24.0),
            wire_between("w1", "s", "d").amps(1.0),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::VoltageMismatchPins);

        // Pin without capabilities: only the source pair remains.
        let wire = wire_between("w1", "s", "d").volts(12.0);
        let issues = run(pin_with_voltage("s", 5.0), pin("d"), wire);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::VoltageMismatchSource);
    }

    #[test]
    fn test_unresolved_endpoint_skips_wire() {
        let issues = run(
            pin_with_voltage("s", 12.0),
            pin_with_voltage("d", 5.0),
            wire_between("w1", "s", "missing").volts(48.0),
        );
        assert!(issues.is_empty());
    }
}
