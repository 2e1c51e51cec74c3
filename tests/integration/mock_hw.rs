//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history, and serves whatever sensor reading the test last placed.

use ballsort::app::events::AppEvent;
use ballsort::app::ports::{ActuatorPort, EventSink, SensorPort};
use ballsort::{Rgb, SensorReading};

pub const BLUE: Rgb = Rgb::new(0.143, 0.427, 0.429);
pub const RED: Rgb = Rgb::new(0.561, 0.232, 0.114);
pub const BACKGROUND: Rgb = Rgb::new(0.33, 0.33, 0.33);

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Intake(f32),
    Accept(f32),
    Reject(f32),
    AllStop,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub reading: SensorReading,
    pub calls: Vec<ActuatorCall>,
    reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            reading: SensorReading::new(0, BACKGROUND),
            calls: Vec::new(),
            reads: 0,
        }
    }

    pub fn place(&mut self, proximity: u32, color: Rgb) {
        self.reading = SensorReading::new(proximity, color);
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Current (intake, accept, reject) duties as the motors would see them.
    pub fn duties(&self) -> (f32, f32, f32) {
        let mut d = (0.0, 0.0, 0.0);
        for call in &self.calls {
            match *call {
                ActuatorCall::Intake(v) => d.0 = v,
                ActuatorCall::Accept(v) => d.1 = v,
                ActuatorCall::Reject(v) => d.2 = v,
                ActuatorCall::AllStop => d = (0.0, 0.0, 0.0),
            }
        }
        d
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> SensorReading {
        self.reads += 1;
        self.reading
    }
}

impl ActuatorPort for MockHardware {
    fn set_intake(&mut self, duty: f32) {
        self.calls.push(ActuatorCall::Intake(duty));
    }

    fn set_accept(&mut self, duty: f32) {
        self.calls.push(ActuatorCall::Accept(duty));
    }

    fn set_reject(&mut self, duty: f32) {
        self.calls.push(ActuatorCall::Reject(duty));
    }

    fn all_stop(&mut self) {
        self.calls.push(ActuatorCall::AllStop);
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything except per-tick telemetry.
    pub fn non_telemetry(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| !matches!(e, AppEvent::Telemetry(_)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
