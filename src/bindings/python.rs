use crate::analysis::load_path;
use crate::config::{validate_config, EngineConfig};
use crate::display;
use crate::snapshot::{HarnessIndex, Project};
use crate::validation::{
    validate_snapshot, Category, RuleRegistry, ValidationOptions, ValidationReport,
};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Python-facing engine. Snapshots, options and results cross the boundary
/// as JSON strings so the Python side stays free of Rust types.
#[pyclass(name = "_ValidationEngine")]
pub struct PyValidationEngine {
    registry: RuleRegistry,
    config: EngineConfig,
}

fn decode<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid {}: {}", what, e)))
}

fn encode<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

impl PyValidationEngine {
    fn options(&self, options_json: Option<&str>) -> PyResult<ValidationOptions> {
        match options_json {
            Some(json) => decode("options", json),
            None => Ok(self.config.default_options.clone()),
        }
    }
}

#[pymethods]
impl PyValidationEngine {
    #[new]
    #[pyo3(signature = (config_json=None))]
    pub fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config: EngineConfig = match config_json {
            Some(json) => decode("config", json)?,
            None => EngineConfig::default(),
        };
        validate_config(&config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let registry = RuleRegistry::builtin().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { registry, config })
    }

    #[pyo3(signature = (project_json, options_json=None))]
    pub fn validate(&self, project_json: &str, options_json: Option<&str>) -> PyResult<String> {
        let project: Project = decode("snapshot", project_json)?;
        let options = self.options(options_json)?;
        encode(&validate_snapshot(&self.registry, &project, &options, self.config.parallel))
    }

    #[pyo3(signature = (project_json, category, options_json=None))]
    pub fn validate_by_category(
        &self,
        project_json: &str,
        category: &str,
        options_json: Option<&str>,
    ) -> PyResult<String> {
        let category = Category::parse(category)
            .ok_or_else(|| PyValueError::new_err(format!("Unknown category: {}", category)))?;
        let project: Project = decode("snapshot", project_json)?;
        let options = self.registry.restrict_to_category(category, self.options(options_json)?);
        encode(&validate_snapshot(&self.registry, &project, &options, self.config.parallel))
    }

    pub fn list_rules(&self) -> PyResult<String> {
        encode(&self.registry.list())
    }

    pub fn assess_load(
        &self,
        project_json: &str,
        load_pin_id: &str,
        current: f64,
    ) -> PyResult<String> {
        let project: Project = decode("snapshot", project_json)?;
        let index = HarnessIndex::build(&project);
        let report = load_path::assess_load(&index, load_pin_id, current, &self.config.load_path)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        encode(&report)
    }

    pub fn format_report(&self, report_json: &str) -> PyResult<String> {
        let report: ValidationReport = decode("report", report_json)?;
        Ok(display::format_report(&report))
    }
}

/// Version of the compiled core, to confirm the bridge is wired up.
#[pyfunction]
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
