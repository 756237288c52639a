//! Connector ingress protection against the installation environment.
use crate::error::RuleError;
use crate::reference::{Environment, IpRating};
use crate::validation::issue::{
    Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

pub struct EnvironmentalRatingRule {
    descriptor: RuleDescriptor,
}

impl EnvironmentalRatingRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "phys-environmental-rating",
                "Environmental Rating",
                "Checks that each connector's IP rating meets the requirement of its installation environment.",
                Category::Physical,
            ),
        }
    }
}

impl Default for EnvironmentalRatingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for EnvironmentalRatingRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for ecu in &ctx.project.ecus {
            for connector in &ecu.connectors {
                let Some(physical) = connector.physical.as_ref() else {
                    continue;
                };
                let Some(env_raw) = physical.environment.as_deref() else {
                    continue;
                };

                let Some(environment) = Environment::parse(env_raw) else {
                    issues.push(
                        Issue::new(
                            IssueCode::UnknownEnvironment,
                            Severity::Warning,
                            Category::Physical,
                            EntityType::Connector,
                            &connector.id,
                            format!(
                                "Connector '{}' has unknown environment '{}'",
                                connector.name, env_raw
                            ),
                        )
                        .with("environment", env_raw),
                    );
                    continue;
                };
                let Some(required) = environment.min_ip_rating() else {
                    continue;
                };
                let required_str = required.to_string();

                let Some(rating_raw) = physical.ip_rating.as_deref() else {
                    issues.push(
                        Issue::new(
                            IssueCode::MissingIpRating,
                            Severity::Error,
                            Category::Physical,
                            EntityType::Connector,
                            &connector.id,
                            format!(
                                "Connector '{}' in {} needs at least {} but has no IP rating",
                                connector.name,
                                environment.as_str(),
                                required_str
                            ),
                        )
                        .with("environment", environment.as_str())
                        .with("requiredRating", required_str.as_str())
                        .with_fix(
                            SuggestedFix::new(FixAction::SetIpRating)
                                .param("connectorId", connector.id.as_str())
                                .param("recommendedRating", required_str.as_str()),
                        ),
                    );
                    continue;
                };

                let Some(actual) = IpRating::parse(rating_raw) else {
                    issues.push(
                        Issue::new(
                            IssueCode::InvalidIpRating,
                            Severity::Error,
                            Category::Physical,
                            EntityType::Connector,
                            &connector.id,
                            format!(
                                "Connector '{}' has malformed IP rating '{}'",
                                connector.name, rating_raw
                            ),
                        )
                        .with("environment", environment.as_str())
                        .with("ipRating", rating_raw)
                        .with("requiredRating", required_str.as_str())
                        .with_fix(
                            SuggestedFix::new(FixAction::SetIpRating)
                                .param("connectorId", connector.id.as_str())
                                .param("recommendedRating", required_str.as_str()),
                        ),
                    );
                    continue;
                };

                if !actual.meets(&required) {
                    issues.push(
                        Issue::new(
                            IssueCode::InsufficientIpRating,
                            Severity::Error,
                            Category::Physical,
                            EntityType::Connector,
                            &connector.id,
                            format!(
                                "Connector '{}' is rated {} but {} requires {}",
                                connector.name,
                                actual,
                                environment.as_str(),
                                required_str
                            ),
                        )
                        .with("environment", environment.as_str())
                        .with("ipRating", actual.to_string())
                        .with("requiredRating", required_str.as_str())
                        .with_fix(
                            SuggestedFix::new(FixAction::UpgradeIpRating)
                                .param("connectorId", connector.id.as_str())
                                .param("currentRating", actual.to_string())
                                .param("recommendedRating", required_str.as_str()),
                        ),
                    );
                }
            }
        }

        Ok(issues)
    }
}
