//! Mating compatibility of the connectors at either end of a wire.
use crate::error::RuleError;
use crate::snapshot::Connector;
use crate::validation::issue::{
    Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use crate::validation::rule::{Rule, RuleDescriptor, ValidationContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Hermaphroditic,
    Genderless,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "HERMAPHRODITIC" => Some(Gender::Hermaphroditic),
            "GENDERLESS" => Some(Gender::Genderless),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Hermaphroditic => "HERMAPHRODITIC",
            Gender::Genderless => "GENDERLESS",
        }
    }

    /// Genders a connector of this gender may mate with, preferred first.
    ///
    /// The table is directed: GENDERLESS accepts MALE and FEMALE, but those
    /// do not accept GENDERLESS in return.
    pub fn mates(&self) -> &'static [Gender] {
        match self {
            Gender::Male => &[Gender::Female],
            Gender::Female => &[Gender::Male],
            Gender::Hermaphroditic => &[Gender::Hermaphroditic],
            Gender::Genderless => &[Gender::Genderless, Gender::Male, Gender::Female],
        }
    }

    pub fn can_mate(&self, other: Gender) -> bool {
        self.mates().contains(&other)
    }
}

pub struct ConnectorGenderRule {
    descriptor: RuleDescriptor,
}

impl ConnectorGenderRule {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(
                "phys-connector-gender",
                "Connector Gender",
                "Checks that the connectors joined by a wire have mating genders.",
                Category::Physical,
            ),
        }
    }
}

impl Default for ConnectorGenderRule {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_gender(connector: &Connector, raw: &str, wire_id: &str, side: &str) -> Issue {
    Issue::new(
        IssueCode::ConnectorUnknownGender,
        Severity::Warning,
        Category::Physical,
        EntityType::Connector,
        &connector.id,
        format!("Connector '{}' has unrecognized gender '{}'", connector.name, raw),
    )
    .with("gender", raw)
    .with("wireId", wire_id)
    .with("side", side)
}

impl Rule for ConnectorGenderRule {
    fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();

        for wire in &ctx.project.wires {
            let (Some(src), Some(dst)) = (ctx.index.source(wire), ctx.index.destination(wire))
            else {
                continue;
            };
            // An absent gender takes no part; an unrecognized one is reported.
            let mut resolve = |connector: &Connector, side: &str| -> Option<Gender> {
                let raw = connector.gender.as_deref()?;
                let gender = Gender::parse(raw);
                if gender.is_none() {
                    issues.push(unknown_gender(connector, raw, &wire.id, side));
                }
                gender
            };
            let src_gender = resolve(src.connector, "source");
            let dst_gender = resolve(dst.connector, "destination");
            let (Some(src_gender), Some(dst_gender)) = (src_gender, dst_gender) else {
                continue;
            };

            if !src_gender.can_mate(dst_gender) {
                let mut issue = Issue::new(
                    IssueCode::ConnectorGenderMismatch,
                    Severity::Error,
                    Category::Physical,
                    EntityType::Wire,
                    &wire.id,
                    format!(
                        "Wire '{}' joins a {} connector '{}' to a {} connector '{}'",
                        wire.label(),
                        src_gender.as_str(),
                        src.connector.name,
                        dst_gender.as_str(),
                        dst.connector.name
                    ),
                )
                .with("sourceConnectorId", src.connector.id.as_str())
                .with("destConnectorId", dst.connector.id.as_str())
                .with("sourceGender", src_gender.as_str())
                .with("destGender", dst_gender.as_str());
                if let Some(mate) = src_gender.mates().first() {
                    issue = issue.with_fix(
                        SuggestedFix::new(FixAction::ChangeConnectorGender)
                            .param("connectorId", dst.connector.id.as_str())
                            .param("currentGender", dst_gender.as_str())
                            .param("recommendedGender", mate.as_str()),
                    );
                }
                issues.push(issue);
            }
        }

        Ok(issues)
    }
}
