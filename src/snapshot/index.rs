//! index.rs
//! Lookup tables over a borrowed `Project`, built once per run.
//!
//! The snapshot is denormalized: wires name their endpoint pins by id and
//! pins may carry declared back-references. The index resolves both
//! directions so rules can walk wire → pin → connector → ECU and
//! pin → incident wires without rescanning the project.

use super::{Connector, Ecu, Pin, Project, Wire};
use std::collections::HashMap;

/// Position of a pin inside the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinLocation {
    pub ecu: usize,
    pub connector: usize,
    pub pin: usize,
}

/// A resolved wire endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub ecu: &'a Ecu,
    pub connector: &'a Connector,
    pub pin: &'a Pin,
}

#[derive(Debug, Clone)]
pub struct HarnessIndex<'a> {
    project: &'a Project,
    pins: HashMap<&'a str, PinLocation>,
    wires: HashMap<&'a str, usize>,
    // Incident wire indices per pin id, in first-seen order.
    wires_from: HashMap<&'a str, Vec<usize>>,
    wires_to: HashMap<&'a str, Vec<usize>>,
}

impl<'a> HarnessIndex<'a> {
    pub fn build(project: &'a Project) -> Self {
        let mut pins = HashMap::new();
        for (e, ecu) in project.ecus.iter().enumerate() {
            for (c, connector) in ecu.connectors.iter().enumerate() {
                for (p, pin) in connector.pins.iter().enumerate() {
                    // A repeated pin id keeps its first location.
                    pins.entry(pin.id.as_str())
                        .or_insert(PinLocation { ecu: e, connector: c, pin: p });
                }
            }
        }

        let mut wires = HashMap::new();
        for (i, wire) in project.wires.iter().enumerate() {
            wires.entry(wire.id.as_str()).or_insert(i);
        }

        let mut index = Self {
            project,
            pins,
            wires,
            wires_from: HashMap::new(),
            wires_to: HashMap::new(),
        };
        index.link_incidence();
        index
    }

    /// Merges declared back-references with the ones implied by wire endpoints.
    fn link_incidence(&mut self) {
        let project = self.project;

        for ecu in &project.ecus {
            for connector in &ecu.connectors {
                for pin in &connector.pins {
                    for wire_ref in &pin.wires_from {
                        if let Some(&w) = self.wires.get(wire_ref.id()) {
                            push_unique(self.wires_from.entry(pin.id.as_str()).or_default(), w);
                        }
                    }
                    for wire_ref in &pin.wires_to {
                        if let Some(&w) = self.wires.get(wire_ref.id()) {
                            push_unique(self.wires_to.entry(pin.id.as_str()).or_default(), w);
                        }
                    }
                }
            }
        }

        for (w, wire) in project.wires.iter().enumerate() {
            if let Some(from) = wire.from_pin.as_ref().map(|r| r.id()) {
                if let Some((&key, _)) = self.pins.get_key_value(from) {
                    push_unique(self.wires_from.entry(key).or_default(), w);
                }
            }
            if let Some(to) = wire.to_pin.as_ref().map(|r| r.id()) {
                if let Some((&key, _)) = self.pins.get_key_value(to) {
                    push_unique(self.wires_to.entry(key).or_default(), w);
                }
            }
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn pin_location(&self, pin_id: &str) -> Option<PinLocation> {
        self.pins.get(pin_id).copied()
    }

    pub fn endpoint(&self, pin_id: &str) -> Option<Endpoint<'a>> {
        let loc = self.pin_location(pin_id)?;
        let ecu = self.project.ecus.get(loc.ecu)?;
        let connector = ecu.connectors.get(loc.connector)?;
        let pin = connector.pins.get(loc.pin)?;
        Some(Endpoint { ecu, connector, pin })
    }

    /// The wire's source endpoint, `None` for dangling or unresolved wires.
    pub fn source(&self, wire: &Wire) -> Option<Endpoint<'a>> {
        wire.from_pin.as_ref().and_then(|r| self.endpoint(r.id()))
    }

    pub fn destination(&self, wire: &Wire) -> Option<Endpoint<'a>> {
        wire.to_pin.as_ref().and_then(|r| self.endpoint(r.id()))
    }

    pub fn wire(&self, wire_id: &str) -> Option<&'a Wire> {
        self.wires.get(wire_id).and_then(|&i| self.project.wires.get(i))
    }

    /// Wires leaving the pin.
    pub fn wires_from(&self, pin_id: &str) -> impl Iterator<Item = &'a Wire> + '_ {
        let project = self.project;
        self.wires_from
            .get(pin_id)
            .into_iter()
            .flatten()
            .filter_map(move |&w| project.wires.get(w))
    }

    /// Wires arriving at the pin.
    pub fn wires_to(&self, pin_id: &str) -> impl Iterator<Item = &'a Wire> + '_ {
        let project = self.project;
        self.wires_to
            .get(pin_id)
            .into_iter()
            .flatten()
            .filter_map(move |&w| project.wires.get(w))
    }

    pub fn is_connected(&self, pin_id: &str) -> bool {
        let has = |m: &HashMap<&'a str, Vec<usize>>| m.get(pin_id).is_some_and(|v| !v.is_empty());
        has(&self.wires_from) || has(&self.wires_to)
    }
}

fn push_unique(list: &mut Vec<usize>, value: usize) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{connector, ecu, pin, wire_between, ProjectBuilder};
    use crate::snapshot::EntityRef;

    #[test]
    fn test_resolves_endpoints_through_the_tree() {
        let project = ProjectBuilder::new("p")
            .ecu(ecu("bcm").connector(connector("x1").pins(&["a", "b"])))
            .ecu(ecu("lamp").connector(connector("x2").pins(&["c"])))
            .wire(wire_between("w1", "a", "c"))
            .build();
        let index = HarnessIndex::build(&project);

        let w = index.wire("w1").unwrap();
        let src = index.source(w).unwrap();
        let dst = index.destination(w).unwrap();
        assert_eq!(src.ecu.id, "bcm");
        assert_eq!(src.connector.id, "x1");
        assert_eq!(dst.ecu.id, "lamp");
        assert_eq!(dst.pin.id, "c");
        assert!(index.is_connected("a"));
        assert!(!index.is_connected("b"));
    }

    #[test]
    fn test_dangling_reference_is_unresolved() {
        let project = ProjectBuilder::new("p")
            .ecu(ecu("bcm").connector(connector("x1").pins(&["a"])))
            .wire(wire_between("w1", "a", "ghost"))
            .build();
        let index = HarnessIndex::build(&project);
        let w = index.wire("w1").unwrap();
        assert!(index.source(w).is_some());
        assert!(index.destination(w).is_none());
        assert_eq!(index.wires_to("ghost").count(), 0);
    }

    #[test]
    fn test_declared_back_references_merge_without_duplicates() {
        let mut declared = pin("a");
        declared.wires_from = vec![EntityRef::from("w1"), EntityRef::from("w2")];
        let mut w2 = wire_between("w2", "z", "z");
        w2.from_pin = None;
        w2.to_pin = None;
        let project = ProjectBuilder::new("p")
            .ecu(ecu("bcm").connector(connector("x1").pin(declared)))
            .wire(wire_between("w1", "a", "a"))
            .wire(w2)
            .build();
        let index = HarnessIndex::build(&project);

        let ids: Vec<&str> = index.wires_from("a").map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
    }
}
