//! Defines the read-only project graph the engine validates.
//!
//! A snapshot is produced by the persistence layer (see [`source`]) and is
//! never mutated during a run. Every block that upstream data may omit is an
//! `Option`, and rules treat absence as "not applicable".
pub mod index;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// Re-export key types for convenient access
pub use index::{HarnessIndex, PinLocation};
pub use source::{InMemoryProjectSource, JsonDirectorySource, ProjectSource};

/// A reference to another entity, accepted either as a bare id or as an
/// object carrying an `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Object { id: String },
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Object { id } => id,
        }
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}

/// Root of the snapshot: one harness design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ecus: Vec<Ecu>,
    #[serde(default)]
    pub wires: Vec<Wire>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Project {
    /// Decodes a snapshot from its JSON wire form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == feature_id)
    }
}

/// An electronic control unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ecu {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub electrical: Option<EcuElectrical>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl Ecu {
    /// The declared supply rating in watts, if the ECU carries one.
    pub fn max_power(&self) -> Option<f64> {
        self.electrical
            .as_ref()
            .and_then(|e| e.power_supply.as_ref())
            .and_then(|ps| ps.max_power)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcuElectrical {
    #[serde(default)]
    pub power_supply: Option<PowerSupply>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSupply {
    /// Watts.
    #[serde(default)]
    pub max_power: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pin_count: Option<u32>,
    /// Raw gender string. Interpretation belongs to the gender rule, which
    /// reports values it does not recognize.
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub physical: Option<ConnectorPhysical>,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorPhysical {
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub ip_rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    pub pin_number: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub capabilities: Option<PinCapabilities>,
    /// Declared back-references to wires leaving this pin.
    #[serde(default)]
    pub wires_from: Vec<EntityRef>,
    /// Declared back-references to wires arriving at this pin.
    #[serde(default)]
    pub wires_to: Vec<EntityRef>,
}

impl Pin {
    /// Nominal voltage, preferring `voltage` over `nominalVoltage`.
    pub fn nominal_voltage(&self) -> Option<f64> {
        let caps = self.capabilities.as_ref()?;
        caps.voltage.or(caps.nominal_voltage)
    }

    pub fn max_current(&self) -> Option<f64> {
        self.capabilities.as_ref().and_then(|c| c.max_current)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinCapabilities {
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub nominal_voltage: Option<f64>,
    /// Current the pin can source or sink, in amps.
    #[serde(default)]
    pub max_current: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from_pin: Option<EntityRef>,
    #[serde(default)]
    pub to_pin: Option<EntityRef>,
    #[serde(default)]
    pub physical: Option<WirePhysical>,
    #[serde(default)]
    pub electrical: Option<WireElectrical>,
    #[serde(default)]
    pub routing: Option<WireRouting>,
}

impl Wire {
    pub fn gauge(&self) -> Option<u32> {
        self.physical.as_ref().and_then(|p| p.gauge)
    }

    /// Meters.
    pub fn length(&self) -> Option<f64> {
        self.physical.as_ref().and_then(|p| p.length)
    }

    pub fn voltage(&self) -> Option<f64> {
        self.electrical.as_ref().and_then(|e| e.voltage)
    }

    /// Amps.
    pub fn max_current(&self) -> Option<f64> {
        self.electrical.as_ref().and_then(|e| e.max_current)
    }

    /// The circuit type, `None` when absent or unrecognized.
    pub fn wire_type(&self) -> Option<WireType> {
        self.electrical
            .as_ref()
            .and_then(|e| e.wire_type.as_deref())
            .and_then(WireType::parse)
    }

    /// Display label used in issue messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePhysical {
    /// AWG.
    #[serde(default)]
    pub gauge: Option<u32>,
    /// Meters.
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireElectrical {
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub max_current: Option<f64>,
    /// Kept as a string so unrecognized values survive decoding.
    #[serde(default, rename = "type")]
    pub wire_type: Option<String>,
}

/// Circuit classification of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireType {
    Power,
    Signal,
    Ground,
}

impl WireType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POWER" => Some(WireType::Power),
            "SIGNAL" => Some(WireType::Signal),
            "GROUND" => Some(WireType::Ground),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WireType::Power => "POWER",
            WireType::Signal => "SIGNAL",
            WireType::Ground => "GROUND",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRouting {
    #[serde(default)]
    pub bends: Vec<Bend>,
    /// Waypoints are opaque to the engine; only their number matters.
    #[serde(default)]
    pub via_points: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bend {
    /// Millimeters.
    #[serde(default)]
    pub radius: Option<f64>,
}

/// A vehicle feature that places a load on a pin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub load_pin: Option<EntityRef>,
    /// Amps.
    #[serde(default)]
    pub current_draw: Option<f64>,
}
