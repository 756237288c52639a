//! Snapshot builders shared by unit tests.
use super::*;

pub(crate) struct ProjectBuilder {
    project: Project,
}

impl ProjectBuilder {
    pub(crate) fn new(id: &str) -> Self {
        Self { project: Project { id: id.into(), ..Default::default() } }
    }

    pub(crate) fn ecu(mut self, ecu: EcuBuilder) -> Self {
        self.project.ecus.push(ecu.ecu);
        self
    }

    pub(crate) fn wire(mut self, wire: Wire) -> Self {
        self.project.wires.push(wire);
        self
    }

    pub(crate) fn feature(mut self, feature: Feature) -> Self {
        self.project.features.push(feature);
        self
    }

    pub(crate) fn build(self) -> Project {
        self.project
    }
}

pub(crate) struct EcuBuilder {
    ecu: Ecu,
}

pub(crate) fn ecu(id: &str) -> EcuBuilder {
    EcuBuilder { ecu: Ecu { id: id.into(), name: id.to_uppercase(), ..Default::default() } }
}

impl EcuBuilder {
    pub(crate) fn connector(mut self, connector: ConnectorBuilder) -> Self {
        self.ecu.connectors.push(connector.connector);
        self
    }

    pub(crate) fn max_power(mut self, watts: f64) -> Self {
        self.ecu.electrical = Some(EcuElectrical {
            power_supply: Some(PowerSupply { max_power: Some(watts) }),
        });
        self
    }
}

pub(crate) struct ConnectorBuilder {
    connector: Connector,
}

pub(crate) fn connector(id: &str) -> ConnectorBuilder {
    ConnectorBuilder {
        connector: Connector { id: id.into(), name: id.to_uppercase(), ..Default::default() },
    }
}

impl ConnectorBuilder {
    /// Adds pins numbered after their position in the connector.
    pub(crate) fn pins(mut self, ids: &[&str]) -> Self {
        for id in ids {
            let number = (self.connector.pins.len() + 1).to_string();
            self.connector.pins.push(pin_numbered(id, &number));
        }
        self
    }

    pub(crate) fn pin(mut self, pin: Pin) -> Self {
        self.connector.pins.push(pin);
        self
    }

    pub(crate) fn pin_count(mut self, count: u32) -> Self {
        self.connector.pin_count = Some(count);
        self
    }

    pub(crate) fn gender(mut self, gender: &str) -> Self {
        self.connector.gender = Some(gender.into());
        self
    }

    pub(crate) fn environment(mut self, environment: &str) -> Self {
        self.connector.physical.get_or_insert_with(Default::default).environment =
            Some(environment.into());
        self
    }

    pub(crate) fn ip_rating(mut self, rating: &str) -> Self {
        self.connector.physical.get_or_insert_with(Default::default).ip_rating =
            Some(rating.into());
        self
    }
}

pub(crate) fn pin(id: &str) -> Pin {
    pin_numbered(id, id)
}

pub(crate) fn pin_numbered(id: &str, number: &str) -> Pin {
    Pin { id: id.into(), pin_number: number.into(), ..Default::default() }
}

pub(crate) fn pin_with_voltage(id: &str, volts: f64) -> Pin {
    Pin {
        capabilities: Some(PinCapabilities { voltage: Some(volts), ..Default::default() }),
        ..pin(id)
    }
}

pub(crate) fn source_pin(id: &str, max_current: f64) -> Pin {
    Pin {
        capabilities: Some(PinCapabilities {
            max_current: Some(max_current),
            ..Default::default()
        }),
        ..pin(id)
    }
}

pub(crate) fn wire(id: &str) -> Wire {
    Wire { id: id.into(), ..Default::default() }
}

pub(crate) fn wire_between(id: &str, from: &str, to: &str) -> Wire {
    Wire {
        from_pin: Some(EntityRef::from(from)),
        to_pin: Some(EntityRef::from(to)),
        ..wire(id)
    }
}

/// Chainable setters for the optional wire blocks.
pub(crate) trait WireFixture: Sized {
    fn awg(self, gauge: u32) -> Self;
    fn length_m(self, meters: f64) -> Self;
    fn volts(self, volts: f64) -> Self;
    fn amps(self, amps: f64) -> Self;
    fn kind(self, wire_type: &str) -> Self;
    fn bends(self, radii_mm: &[f64]) -> Self;
    fn via_points(self, count: usize) -> Self;
}

impl WireFixture for Wire {
    fn awg(mut self, gauge: u32) -> Self {
        self.physical.get_or_insert_with(Default::default).gauge = Some(gauge);
        self
    }

    fn length_m(mut self, meters: f64) -> Self {
        self.physical.get_or_insert_with(Default::default).length = Some(meters);
        self
    }

    fn volts(mut self, volts: f64) -> Self {
        self.electrical.get_or_insert_with(Default::default).voltage = Some(volts);
        self
    }

    fn amps(mut self, amps: f64) -> Self {
        self.electrical.get_or_insert_with(Default::default).max_current = Some(amps);
        self
    }

    fn kind(mut self, wire_type: &str) -> Self {
        self.electrical.get_or_insert_with(Default::default).wire_type = Some(wire_type.into());
        self
    }

    fn bends(mut self, radii_mm: &[f64]) -> Self {
        let routing = self.routing.get_or_insert_with(Default::default);
        routing.bends = radii_mm.iter().map(|&r| Bend { radius: Some(r) }).collect();
        self
    }

    fn via_points(mut self, count: usize) -> Self {
        let routing = self.routing.get_or_insert_with(Default::default);
        routing.via_points = (0..count).map(|i| serde_json::json!({ "seq": i })).collect();
        self
    }
}
