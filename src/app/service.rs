//! Application service: the hexagonal core.
//!
//! [`SortService`] owns the [`SortController`] and the operator latch and
//! exposes a hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the pipeline testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      SortService       │
//! ActuatorPort ◀──│  Operator · Controller │
//!                 └────────────────────────┘
//! ```

use std::sync::Arc;

use log::info;

use crate::config::SorterConfig;
use crate::controller::SortController;
use crate::error::Result;
use crate::fsm::SortingState;
use crate::fsm::context::ActuatorCommand;
use crate::operator::{OperatorRequest, OperatorSwitch};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// SortService
// ───────────────────────────────────────────────────────────────

pub struct SortService {
    controller: SortController,
    operator: Arc<OperatorSwitch>,
    tick_count: u64,
}

impl SortService {
    /// Construct the service from configuration.  The sorter starts
    /// disabled; call [`start`](Self::start) before the first tick.
    pub fn new(config: SorterConfig) -> Result<Self> {
        Ok(Self {
            controller: SortController::new(config)?,
            operator: Arc::new(OperatorSwitch::new()),
            tick_count: 0,
        })
    }

    /// Handle for input callbacks running outside the control loop.
    pub fn operator(&self) -> Arc<OperatorSwitch> {
        Arc::clone(&self.operator)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the motors in a known state and announce the initial state.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_stop();
        sink.emit(&AppEvent::Started(self.controller.state()));
        info!("SortService started in {}", self.controller.state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: operator → sensor → controller → motors.
    ///
    /// `hw` satisfies **both** [`SensorPort`] and [`ActuatorPort`], which
    /// avoids a double mutable borrow while keeping the boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u64,
        sink: &mut impl EventSink,
    ) -> TelemetryData {
        self.tick_count += 1;

        // 1. Operator requests posted since the last tick
        if let Some(request) = self.operator.take() {
            match request {
                OperatorRequest::Enable => self.set_enabled(true, hw, sink),
                OperatorRequest::Disable => self.set_enabled(false, hw, sink),
            }
        }

        // 2. Sensor
        let reading = hw.read();

        // 3. Controller
        let prev_state = self.controller.state();
        let (cmd, status) = self.controller.tick(reading, now_ms);

        // 4. Motors
        apply_actuators(hw, &cmd);

        // 5. Events
        if let Some(d) = self.controller.decision() {
            sink.emit(&AppEvent::BallClassified {
                color: d.color,
                confidence: d.confidence,
                accepted: d.accepted,
            });
        }
        if status.state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: status.state,
            });
        }

        let config = self.controller.config();
        let telemetry = TelemetryData {
            t_ms: now_ms,
            state: status.state,
            presence: status.presence,
            last_color_label: status.last_color_label,
            enabled: status.enabled,
            proximity: reading.proximity,
            red: reading.color.r,
            green: reading.color.g,
            blue: reading.color.b,
            last_confidence: self.controller.last_match().map(|(_, c)| c),
            target_color: config.target_color,
            intake: cmd.intake,
            accept: cmd.accept,
            reject: cmd.reject,
        };
        sink.emit(&AppEvent::Telemetry(telemetry.clone()));
        telemetry
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external command.  Config-bearing commands are validated;
    /// a rejected command changes nothing.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::Enable => self.set_enabled(true, hw, sink),
            AppCommand::Disable => self.set_enabled(false, hw, sink),
            AppCommand::SetTarget(color) => self.controller.set_target(color),
            AppCommand::SetProximityThreshold(threshold) => {
                self.controller.set_proximity_threshold(threshold);
            }
            AppCommand::SetConfidenceThreshold(threshold) => {
                self.controller.set_confidence_threshold(threshold)?;
            }
            AppCommand::Calibrate { color, reference } => {
                self.controller.calibrate(color, reference)?;
            }
            AppCommand::UpdateConfig(config) => self.controller.reconfigure(config)?,
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SortingState {
        self.controller.state()
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.is_enabled()
    }

    pub fn controller(&self) -> &SortController {
        &self.controller
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_enabled(&mut self, on: bool, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if on == self.controller.is_enabled() {
            return;
        }
        let prev_state = self.controller.state();
        if on {
            self.controller.enable();
        } else {
            self.controller.disable();
            hw.all_stop();
        }
        sink.emit(&AppEvent::EnabledChanged(on));
        let state = self.controller.state();
        if state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: state,
            });
        }
    }
}

/// Write every channel of `cmd`; the sink always sees a complete command.
fn apply_actuators(hw: &mut impl ActuatorPort, cmd: &ActuatorCommand) {
    if cmd.is_stopped() {
        hw.all_stop();
        return;
    }
    hw.set_intake(cmd.intake);
    hw.set_accept(cmd.accept);
    hw.set_reject(cmd.reject);
}
