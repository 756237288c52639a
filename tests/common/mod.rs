#![allow(dead_code)]

use harness_validation_core::{InMemoryProjectSource, Project, ValidationService};
use serde_json::{json, Value};
use std::sync::Arc;

/// Routes engine logs through the test harness's captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("harness_validation_core=debug"))
        .with_test_writer()
        .try_init();
}

pub fn pin(id: &str, number: &str) -> Value {
    json!({ "id": id, "pinNumber": number })
}

pub fn pin_v(id: &str, number: &str, volts: f64) -> Value {
    json!({ "id": id, "pinNumber": number, "capabilities": { "voltage": volts } })
}

pub fn connector(id: &str, pins: Vec<Value>) -> Value {
    json!({ "id": id, "name": id.to_uppercase(), "pins": pins })
}

pub fn ecu(id: &str, connectors: Vec<Value>) -> Value {
    json!({ "id": id, "name": id.to_uppercase(), "connectors": connectors })
}

pub fn project(id: &str, ecus: Vec<Value>, wires: Vec<Value>) -> Project {
    serde_json::from_value(json!({ "id": id, "ecus": ecus, "wires": wires }))
        .expect("fixture snapshot")
}

pub fn service_for(projects: Vec<Project>) -> ValidationService {
    let mut source = InMemoryProjectSource::new();
    for p in projects {
        source.insert(p);
    }
    ValidationService::with_builtin_rules(Arc::new(source)).expect("builtin service")
}
