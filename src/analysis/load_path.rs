//! Feature load impact: traces a new load back to the pin that supplies it.
//!
//! Pins become graph nodes and wires become undirected edges weighted by
//! their resistance. The supplying pin is the nearest pin, by total path
//! resistance, that declares a current capacity. The path is then checked
//! for source overcurrent and end-to-end voltage drop.
use crate::config::LoadPathConfig;
use crate::error::EngineError;
use crate::reference;
use crate::snapshot::{HarnessIndex, Pin, Wire};
use crate::validation::issue::{
    round2, Category, EntityType, FixAction, Issue, IssueCode, Severity, SuggestedFix,
};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribution stamped on issues raised by this analysis.
pub const LOAD_PATH_SOURCE_ID: &str = "analysis-load-path";

#[derive(Debug, Clone, Copy)]
struct WireEdge<'a> {
    wire: &'a Wire,
    resistance: f64,
    /// False when gauge or length is missing; the wire then weighs nothing.
    rated: bool,
}

/// The wiring of a project as an undirected pin graph.
pub struct WiringGraph<'a> {
    graph: UnGraph<&'a Pin, WireEdge<'a>>,
    nodes: HashMap<&'a str, NodeIndex>,
}

impl<'a> WiringGraph<'a> {
    pub fn build(index: &HarnessIndex<'a>) -> Self {
        let project = index.project();
        let mut graph = UnGraph::default();
        let mut nodes = HashMap::new();

        for ecu in &project.ecus {
            for connector in &ecu.connectors {
                for pin in &connector.pins {
                    nodes.entry(pin.id.as_str()).or_insert_with(|| graph.add_node(pin));
                }
            }
        }

        for wire in &project.wires {
            let (Some(src), Some(dst)) = (index.source(wire), index.destination(wire)) else {
                continue;
            };
            let (Some(&a), Some(&b)) =
                (nodes.get(src.pin.id.as_str()), nodes.get(dst.pin.id.as_str()))
            else {
                continue;
            };
            let rpm = wire.gauge().and_then(reference::resistance_per_meter);
            let resistance = match (rpm, wire.length()) {
                (Some(rpm), Some(length)) if length.is_finite() && length >= 0.0 => {
                    Some(rpm * length)
                }
                _ => None,
            };
            graph.add_edge(
                a,
                b,
                WireEdge {
                    wire,
                    resistance: resistance.unwrap_or(0.0),
                    rated: resistance.is_some(),
                },
            );
        }

        Self { graph, nodes }
    }

    pub fn pin_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn wire_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Least-resistance route from `load_pin` to the nearest other pin with a
    /// declared `maxCurrent`.
    fn nearest_source(&self, load_pin: &str) -> Option<TracedPath<'a>> {
        let &start = self.nodes.get(load_pin)?;
        let graph = &self.graph;
        let (resistance, nodes) = astar(
            graph,
            start,
            |n| n != start && graph[n].max_current().is_some(),
            |e| e.weight().resistance,
            |_| 0.0,
        )?;

        let mut wires = Vec::with_capacity(nodes.len().saturating_sub(1));
        for pair in nodes.windows(2) {
            let edge = graph
                .edges_connecting(pair[0], pair[1])
                .map(|e| *e.weight())
                .min_by(|x, y| x.resistance.total_cmp(&y.resistance))?;
            wires.push(edge);
        }
        let pins = nodes.iter().map(|&n| graph[n]).collect();
        Some(TracedPath { pins, wires, resistance })
    }
}

struct TracedPath<'a> {
    pins: Vec<&'a Pin>,
    wires: Vec<WireEdge<'a>>,
    resistance: f64,
}

/// Outcome of placing one load on the harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadImpactReport {
    pub project_id: String,
    #[serde(default)]
    pub feature_id: Option<String>,
    pub load_pin_id: String,
    /// Amps drawn by the load.
    pub current: f64,
    pub source_pin_id: Option<String>,
    /// Pin ids from the load pin to the source pin.
    pub pin_path: Vec<String>,
    pub wire_path: Vec<String>,
    /// Ohms, summed over rated wires.
    pub total_resistance: f64,
    /// Volts, `current * total_resistance`.
    pub voltage_drop: f64,
    /// `maxCurrent` of the source pin, in amps.
    pub source_capacity: Option<f64>,
    /// Wires on the path that lack gauge or length data.
    pub unrated_wires: Vec<String>,
    pub passed: bool,
    pub issues: Vec<Issue>,
}

/// Assesses a declared feature using its `loadPin` and `currentDraw`.
pub fn assess_feature(
    index: &HarnessIndex<'_>,
    feature_id: &str,
    config: &LoadPathConfig,
) -> Result<LoadImpactReport, EngineError> {
    let project = index.project();
    let feature = project.feature(feature_id).ok_or_else(|| EngineError::FeatureNotFound {
        project_id: project.id.clone(),
        feature_id: feature_id.to_string(),
    })?;
    let load_pin = feature.load_pin.as_ref().ok_or_else(|| EngineError::FeatureIncomplete {
        feature_id: feature_id.to_string(),
        reason: "no load pin".to_string(),
    })?;
    let current = feature.current_draw.ok_or_else(|| EngineError::FeatureIncomplete {
        feature_id: feature_id.to_string(),
        reason: "no current draw".to_string(),
    })?;

    let mut report = assess_load(index, load_pin.id(), current, config)?;
    report.feature_id = Some(feature_id.to_string());
    Ok(report)
}

/// Assesses `current` amps drawn at `load_pin_id`.
pub fn assess_load(
    index: &HarnessIndex<'_>,
    load_pin_id: &str,
    current: f64,
    config: &LoadPathConfig,
) -> Result<LoadImpactReport, EngineError> {
    let project = index.project();
    let load_pin = index
        .endpoint(load_pin_id)
        .map(|e| e.pin)
        .ok_or_else(|| EngineError::PinNotFound {
            project_id: project.id.clone(),
            pin_id: load_pin_id.to_string(),
        })?;

    let graph = WiringGraph::build(index);
    let mut report = LoadImpactReport {
        project_id: project.id.clone(),
        feature_id: None,
        load_pin_id: load_pin.id.clone(),
        current,
        source_pin_id: None,
        pin_path: Vec::new(),
        wire_path: Vec::new(),
        total_resistance: 0.0,
        voltage_drop: 0.0,
        source_capacity: None,
        unrated_wires: Vec::new(),
        passed: false,
        issues: Vec::new(),
    };

    let Some(path) = graph.nearest_source(load_pin_id) else {
        report.issues.push(stamp(
            Issue::new(
                IssueCode::NoPowerPath,
                Severity::Error,
                Category::Electrical,
                EntityType::Pin,
                &load_pin.id,
                format!("Pin '{}' has no wiring path to a current-rated source pin", load_pin.id),
            )
            .with("current", current),
        ));
        tracing::info!(project_id = %project.id, load_pin = %load_pin.id, "No power path for load");
        return Ok(report);
    };

    let source = path.pins.last().copied().unwrap_or(load_pin);
    let capacity = source.max_current();
    let drop = current * path.resistance;

    report.source_pin_id = Some(source.id.clone());
    report.pin_path = path.pins.iter().map(|p| p.id.clone()).collect();
    report.wire_path = path.wires.iter().map(|w| w.wire.id.clone()).collect();
    report.unrated_wires =
        path.wires.iter().filter(|w| !w.rated).map(|w| w.wire.id.clone()).collect();
    report.total_resistance = path.resistance;
    report.voltage_drop = drop;
    report.source_capacity = capacity;

    if let Some(capacity) = capacity {
        if current > capacity {
            report.issues.push(stamp(
                Issue::new(
                    IssueCode::PinOvercurrent,
                    Severity::Error,
                    Category::Electrical,
                    EntityType::Pin,
                    &source.id,
                    format!(
                        "Source pin '{}' is rated for {}A but the load draws {}A",
                        source.id, capacity, current
                    ),
                )
                .with("current", current)
                .with("maxCurrent", capacity)
                .with("loadPinId", load_pin.id.as_str())
                .with_fix(
                    SuggestedFix::new(FixAction::ReduceLoad)
                        .param("currentLoad", current)
                        .param("targetLoad", capacity),
                ),
            ));
        }
    }

    if drop > config.max_voltage_drop_volts {
        let mut issue = Issue::new(
            IssueCode::LoadPathVoltageDrop,
            Severity::Error,
            Category::Electrical,
            EntityType::Pin,
            &load_pin.id,
            format!(
                "Path from '{}' to '{}' drops {:.3}V, above the {}V limit",
                source.id, load_pin.id, drop, config.max_voltage_drop_volts
            ),
        )
        .with("voltageDrop", drop)
        .with("maxVoltageDrop", config.max_voltage_drop_volts)
        .with("totalResistance", path.resistance)
        .with("wirePath", report.wire_path.clone());
        if path.resistance > 0.0 {
            issue = issue.with_fix(
                SuggestedFix::new(FixAction::ReduceLoad)
                    .param("currentLoad", current)
                    .param("targetLoad", round2(config.max_voltage_drop_volts / path.resistance)),
            );
        }
        report.issues.push(stamp(issue));
    }

    report.passed = !report.issues.iter().any(Issue::is_error);
    tracing::info!(
        project_id = %project.id,
        load_pin = %load_pin.id,
        source_pin = %source.id,
        voltage_drop = drop,
        passed = report.passed,
        "Load impact assessed"
    );
    Ok(report)
}

fn stamp(mut issue: Issue) -> Issue {
    issue.rule_id = LOAD_PATH_SOURCE_ID.to_string();
    issue
}
