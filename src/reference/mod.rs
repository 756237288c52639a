//! Static engineering reference data keyed by AWG gauge.
//!
//! AWG 0 is the bucket for 0 and every larger class (00 through 0000).
//! Rows are ordered from the thickest gauge to the thinnest so that gauge
//! searches can walk the table in reverse.
pub mod ip;

pub use ip::{Environment, IpRating};

/// Safety margin applied to every ampacity lookup before comparison.
pub const DERATING_FACTOR: f64 = 0.8;

/// Minimum bend radius as a multiple of conductor diameter.
pub const BEND_RADIUS_FACTOR: f64 = 4.0;

/// One row of the gauge table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSpec {
    pub awg: u32,
    /// Continuous current rating in amps, before derating.
    pub ampacity: f64,
    pub resistance_per_meter: f64,
    /// Conductor diameter in millimeters.
    pub diameter_mm: f64,
    /// Manufacturability limit on a single run, in meters.
    pub max_practical_length: f64,
}

impl GaugeSpec {
    pub fn derated_ampacity(&self) -> f64 {
        self.ampacity * DERATING_FACTOR
    }

    pub fn min_bend_radius_mm(&self) -> f64 {
        BEND_RADIUS_FACTOR * self.diameter_mm
    }
}

const fn row(
    awg: u32,
    ampacity: f64,
    resistance_per_meter: f64,
    diameter_mm: f64,
    max_practical_length: f64,
) -> GaugeSpec {
    GaugeSpec { awg, ampacity, resistance_per_meter, diameter_mm, max_practical_length }
}

static GAUGES: [GaugeSpec; 16] = [
    row(0, 150.0, 0.000161, 11.684, 30.0),
    row(1, 110.0, 0.000407, 7.348, 30.0),
    row(2, 95.0, 0.000513, 6.544, 30.0),
    row(4, 70.0, 0.000815, 5.189, 30.0),
    row(6, 55.0, 0.001296, 4.115, 25.0),
    row(8, 40.0, 0.002061, 3.264, 25.0),
    row(10, 30.0, 0.003277, 2.588, 20.0),
    row(12, 20.0, 0.005211, 2.053, 20.0),
    row(14, 15.0, 0.008286, 1.628, 15.0),
    row(16, 10.0, 0.013170, 1.291, 15.0),
    row(18, 7.0, 0.020950, 1.024, 12.0),
    row(20, 5.0, 0.033310, 0.812, 10.0),
    row(22, 3.0, 0.052960, 0.644, 8.0),
    row(24, 2.1, 0.084220, 0.511, 5.0),
    row(26, 1.3, 0.133900, 0.405, 3.0),
    row(28, 0.8, 0.212900, 0.321, 2.0),
];

pub fn gauge_spec(awg: u32) -> Option<&'static GaugeSpec> {
    GAUGES.iter().find(|g| g.awg == awg)
}

pub fn ampacity(awg: u32) -> Option<f64> {
    gauge_spec(awg).map(|g| g.ampacity)
}

pub fn resistance_per_meter(awg: u32) -> Option<f64> {
    gauge_spec(awg).map(|g| g.resistance_per_meter)
}

pub fn wire_diameter_mm(awg: u32) -> Option<f64> {
    gauge_spec(awg).map(|g| g.diameter_mm)
}

pub fn max_practical_length(awg: u32) -> Option<f64> {
    gauge_spec(awg).map(|g| g.max_practical_length)
}

/// Every mapped gauge, thickest first.
pub fn gauges() -> &'static [GaugeSpec] {
    &GAUGES
}

fn thickest() -> &'static GaugeSpec {
    &GAUGES[0]
}

/// Smallest conductor (largest AWG) whose derated ampacity carries `required_current`.
/// Falls back to the thickest gauge when nothing in the table is sufficient.
pub fn recommended_gauge_for_current(required_current: f64) -> u32 {
    GAUGES
        .iter()
        .rev()
        .find(|g| g.derated_ampacity() >= required_current)
        .unwrap_or_else(|| thickest())
        .awg
}

/// Smallest conductor whose resistance per meter does not exceed `max_ohms_per_meter`.
pub fn recommended_gauge_for_resistance(max_ohms_per_meter: f64) -> u32 {
    GAUGES
        .iter()
        .rev()
        .find(|g| g.resistance_per_meter <= max_ohms_per_meter)
        .unwrap_or_else(|| thickest())
        .awg
}
