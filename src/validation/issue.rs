//! Defines the issue model produced by rules.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

/// How bad a finding is. Only `Error` makes a report invalid.
///
/// The derived ordering ranks `Error` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Electrical,
    Physical,
    Protocol,
    Safety,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electrical => "ELECTRICAL",
            Category::Physical => "PHYSICAL",
            Category::Protocol => "PROTOCOL",
            Category::Safety => "SAFETY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ELECTRICAL" => Some(Category::Electrical),
            "PHYSICAL" => Some(Category::Physical),
            "PROTOCOL" => Some(Category::Protocol),
            "SAFETY" => Some(Category::Safety),
            _ => None,
        }
    }
}

/// Kind of snapshot entity an issue points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Wire,
    Ecu,
    Connector,
    Pin,
    Project,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Wire => "wire",
            EntityType::Ecu => "ecu",
            EntityType::Connector => "connector",
            EntityType::Pin => "pin",
            EntityType::Project => "project",
        }
    }
}

/// Stable machine identifiers for every finding the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    WireOvercurrent,
    WireHighUtilization,
    WireUnknownGauge,
    VoltageMismatchSource,
    VoltageMismatchDest,
    VoltageMismatchPins,
    VoltageDropExcessive,
    VoltageDropHigh,
    PowerBudgetExceeded,
    PowerBudgetHigh,
    ConnectorGenderMismatch,
    ConnectorUnknownGender,
    PinCountMismatch,
    DuplicatePinNumbers,
    UnconnectedPins,
    MissingIpRating,
    InsufficientIpRating,
    InvalidIpRating,
    UnknownEnvironment,
    WireLengthExcessive,
    BendRadiusTooSmall,
    ExcessiveRoutingComplexity,
    NoPowerPath,
    PinOvercurrent,
    LoadPathVoltageDrop,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::WireOvercurrent => "WIRE_OVERCURRENT",
            IssueCode::WireHighUtilization => "WIRE_HIGH_UTILIZATION",
            IssueCode::WireUnknownGauge => "WIRE_UNKNOWN_GAUGE",
            IssueCode::VoltageMismatchSource => "VOLTAGE_MISMATCH_SOURCE",
            IssueCode::VoltageMismatchDest => "VOLTAGE_MISMATCH_DEST",
            IssueCode::VoltageMismatchPins => "VOLTAGE_MISMATCH_PINS",
            IssueCode::VoltageDropExcessive => "VOLTAGE_DROP_EXCESSIVE",
            IssueCode::VoltageDropHigh => "VOLTAGE_DROP_HIGH",
            IssueCode::PowerBudgetExceeded => "POWER_BUDGET_EXCEEDED",
            IssueCode::PowerBudgetHigh => "POWER_BUDGET_HIGH",
            IssueCode::ConnectorGenderMismatch => "CONNECTOR_GENDER_MISMATCH",
            IssueCode::ConnectorUnknownGender => "CONNECTOR_UNKNOWN_GENDER",
            IssueCode::PinCountMismatch => "PIN_COUNT_MISMATCH",
            IssueCode::DuplicatePinNumbers => "DUPLICATE_PIN_NUMBERS",
            IssueCode::UnconnectedPins => "UNCONNECTED_PINS",
            IssueCode::MissingIpRating => "MISSING_IP_RATING",
            IssueCode::InsufficientIpRating => "INSUFFICIENT_IP_RATING",
            IssueCode::InvalidIpRating => "INVALID_IP_RATING",
            IssueCode::UnknownEnvironment => "UNKNOWN_ENVIRONMENT",
            IssueCode::WireLengthExcessive => "WIRE_LENGTH_EXCESSIVE",
            IssueCode::BendRadiusTooSmall => "BEND_RADIUS_TOO_SMALL",
            IssueCode::ExcessiveRoutingComplexity => "EXCESSIVE_ROUTING_COMPLEXITY",
            IssueCode::NoPowerPath => "NO_POWER_PATH",
            IssueCode::PinOvercurrent => "PIN_OVERCURRENT",
            IssueCode::LoadPathVoltageDrop => "LOAD_PATH_VOLTAGE_DROP",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory remediation. Never applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixAction {
    IncreaseWireGauge,
    ReduceWireLength,
    ReduceLoad,
    ChangeConnectorGender,
    AddPins,
    UpdatePinCount,
    RenumberPins,
    SetIpRating,
    UpgradeIpRating,
    IncreaseBendRadius,
    SimplifyRouting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    pub action: FixAction,
    pub params: BTreeMap<String, Value>,
}

impl SuggestedFix {
    pub fn new(action: FixAction) -> Self {
        Self { action, params: BTreeMap::new() }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// A single engineering finding.
///
/// `context` carries the numeric inputs behind the verdict so a reviewer can
/// audit it without rerunning the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub context: BTreeMap<String, Value>,
    pub suggested_fixes: SmallVec<[SuggestedFix; 2]>,
    /// Id of the rule that produced the issue. Stamped by the validator.
    #[serde(default)]
    pub rule_id: String,
}

impl Issue {
    pub fn new(
        code: IssueCode,
        severity: Severity,
        category: Category,
        entity_type: EntityType,
        entity_id: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            category,
            message: message.into(),
            entity_id: entity_id.to_string(),
            entity_type,
            context: BTreeMap::new(),
            suggested_fixes: SmallVec::new(),
            rule_id: String::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fixes.push(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Two-decimal rounding for derived percentages in context maps.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
