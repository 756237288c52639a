//! Constraint validation engine for vehicle wiring harness designs.
//!
//! A harness snapshot (ECUs, connectors, pins, wires) is run through a
//! registry of engineering rules and every finding is collected into a
//! `ValidationReport`. The same snapshot can be asked how a new feature load
//! propagates back to its supplying pin.
//!
//! With the `python` feature, this crate also builds the `_core` extension
//! module.

pub mod analysis;
pub mod config;
pub mod display;
pub mod error;
pub mod reference;
pub mod snapshot;
pub mod validation;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use config::{validate_config, EngineConfig, LoadPathConfig};
pub use error::{EngineError, RuleError, SourceError};
pub use snapshot::{InMemoryProjectSource, JsonDirectorySource, Project, ProjectSource};
pub use validation::{
    Category, Issue, IssueCode, Rule, RuleDescriptor, RuleRegistry, Severity, ValidationOptions,
    ValidationReport, ValidationService,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// This function defines the `_core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyValidationEngine>()?;
    m.add_function(wrap_pyfunction!(bindings::python::core_version, m)?)?;
    Ok(())
}
