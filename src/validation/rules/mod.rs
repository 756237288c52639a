//! The built-in engineering checks.
pub mod ampacity;
pub mod connector_gender;
pub mod environmental;
pub mod pin_count;
pub mod power_budget;
pub mod routing;
pub mod voltage_compat;
pub mod voltage_drop;

use super::rule::Rule;

pub use ampacity::WireAmpacityRule;
pub use connector_gender::{ConnectorGenderRule, Gender};
pub use environmental::EnvironmentalRatingRule;
pub use pin_count::PinCountRule;
pub use power_budget::PowerBudgetRule;
pub use routing::WireRoutingRule;
pub use voltage_compat::VoltageCompatibilityRule;
pub use voltage_drop::VoltageDropRule;

/// Every built-in rule in registration order: electrical checks first, then
/// physical ones.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(WireAmpacityRule::new()),
        Box::new(VoltageCompatibilityRule::new()),
        Box::new(VoltageDropRule::new()),
        Box::new(PowerBudgetRule::new()),
        Box::new(ConnectorGenderRule::new()),
        Box::new(PinCountRule::new()),
        Box::new(EnvironmentalRatingRule::new()),
        Box::new(WireRoutingRule::new()),
    ]
}
