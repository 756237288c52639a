//! Manufacturability of a wire's physical route.
use crate::error::RuleError;
use crate::reference;
use crate::validation::issue::{
    Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

/// Via points beyond this count make a route hard to manufacture.
pub const MAX_VIA_POINTS: usize = 20;

pub struct WireRoutingRule {
    descriptor: RuleDescriptor,
}

impl WireRoutingRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "phys-wire-routing",
                "Wire Routing",
                "Checks run length, bend radii and routing complexity of each wire.",
                Category::Physical,
            ),
        }
    }
}

impl Default for WireRoutingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for WireRoutingRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for wire in &ctx.project.wires {
            let spec = wire.gauge().and_then(reference::gauge_spec);

            if let (Some(spec), Some(length)) = (spec, wire.length()) {
                if length > spec.max_practical_length {
                    issues.push(
                        Issue::new(
                            IssueCode::WireLengthExcessive,
                            Severity::Warning,
                            Category::Physical,
                            EntityType::Wire,
                            &wire.id,
                            format!(
                                "Wire '{}' runs {:.2}m, beyond the {}m practical limit for AWG {}",
                                wire.label(),
                                length,
                                spec.max_practical_length,
                                spec.awg
                            ),
                        )
                        .with("gauge", spec.awg)
                        .with("length", length)
                        .with("maxLength", spec.max_practical_length)
                        .with_fix(
                            SuggestedFix::new(FixAction::ReduceWireLength)
                                .param("currentLength", length)
                                .param("maxLength", spec.max_practical_length),
                        ),
                    );
                }
            }

            let Some(routing) = wire.routing.as_ref() else {
                continue;
            };

            if let Some(spec) = spec {
                let min_radius = spec.min_bend_radius_mm();
                for (i, bend) in routing.bends.iter().enumerate() {
                    let Some(radius) = bend.radius else { continue };
                    if radius < min_radius {
                        issues.push(
                            Issue::new(
                                IssueCode::BendRadiusTooSmall,
                                Severity::Error,
                                Category::Physical,
                                EntityType::Wire,
                                &wire.id,
                                format!(
                                    "Wire '{}' bend {} has radius {:.2}mm, below the {:.2}mm minimum for AWG {}",
                                    wire.label(),
                                    i,
                                    radius,
                                    min_radius,
                                    spec.awg
                                ),
                            )
                            .with("bendIndex", i)
                            .with("radius", radius)
                            .with("minRadius", min_radius)
                            .with("gauge", spec.awg)
                            .with_fix(
                                SuggestedFix::new(FixAction::IncreaseBendRadius)
                                    .param("bendIndex", i)
                                    .param("minRadius", min_radius),
                            ),
                        );
                    }
                }
            }

            let via_count = routing.via_points.len();
            if via_count > MAX_VIA_POINTS {
                issues.push(
                    Issue::new(
                        IssueCode::ExcessiveRoutingComplexity,
                        Severity::Warning,
                        Category::Physical,
                        EntityType::Wire,
                        &wire.id,
                        format!(
                            "Wire '{}' is routed through {} via points",
                            wire.label(),
                            via_count
                        ),
                    )
                    .with("viaPoints", via_count)
                    .with("maxViaPoints", MAX_VIA_POINTS)
                    .with_fix(
                        SuggestedFix::new(FixAction::SimplifyRouting)
                            .param("maxViaPoints", MAX_VIA_POINTS),
                    ),
                );
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{wire, ProjectBuilder, WireFixture};
    use crate::snapshot::{HarnessIndex, Wire};
    use crate::validation::options::ValidationOptions;
    use rstest::rstest;

    fn run(w: Wire) -> Vec<Issue> {
        let project = ProjectBuilder::new("p").wire(w).build();
        let index = HarnessIndex::build(&project);
        let options = ValidationOptions::default();
        WireRoutingRule::new().validate(&ValidationContext::new(&index, &options)).unwrap()
    }

    #[rstest]
    #[case(8.0, 0)]
    #[case(8.5, 1)]
    fn test_length_limit_for_awg_22(#[case] length: f64, #[case] expected: usize) {
        let issues = run(wire("w1").awg(22).length_m(length));
        assert_eq!(issues.len(), expected);
        assert!(issues.iter().all(|i| i.code == IssueCode::WireLengthExcessive));
    }

    #[test]
    fn test_each_tight_bend_is_reported_with_its_index() {
        // 22 AWG minimum radius is 4 * 0.644 = 2.576mm.
        let issues = run(wire("w1").awg(22).bends(&[3.0, 1.0, 2.5, 10.0]));
        let indices: Vec<u64> =
            issues.iter().map(|i| i.context["bendIndex"].as_u64().unwrap()).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
    }

    #[test]
    fn test_via_point_threshold() {
        assert!(run(wire("w1").via_points(20)).is_empty());
        let issues = run(wire("w1").via_points(21));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::ExcessiveRoutingComplexity);
    }

    #[test]
    fn test_unmapped_gauge_skips_length_and_bends() {
        assert!(run(wire("w1").awg(23).length_m(100.0).bends(&[0.1])).is_empty());
    }
}
