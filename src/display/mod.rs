//! Human-readable renderings of engine output.
pub mod report;

pub use report::{format_load_impact, format_report};
