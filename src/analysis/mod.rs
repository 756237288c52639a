//! Whole-harness analyses that run outside the rule registry.
pub mod load_path;

pub use load_path::{assess_feature, assess_load, LoadImpactReport, WiringGraph};
