//! Shared mutable context threaded through every FSM handler.
//!
//! `SortContext` is the single struct that state handlers read from and
//! write to: the current sensor sample and what was derived from it,
//! actuator outputs, timing, configuration and the colour matcher.

use serde::Serialize;

use super::SortingState;
use crate::config::SorterConfig;
use crate::sensors::SensorReading;
use crate::sensors::color::{ColorMatch, ColorMatcher, TargetColor};

// ---------------------------------------------------------------------------
// Actuator command (written by state handlers; consumed by the host)
// ---------------------------------------------------------------------------

/// Duty for each of the three sorting motors, -1.0 to 1.0.
/// Always complete: channels a state does not drive are 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ActuatorCommand {
    pub intake: f32,
    pub accept: f32,
    pub reject: f32,
}

impl ActuatorCommand {
    /// All motors stopped.
    pub fn all_stop() -> Self {
        Self::default()
    }

    pub fn is_stopped(&self) -> bool {
        self.intake == 0.0 && self.accept == 0.0 && self.reject == 0.0
    }
}

// ---------------------------------------------------------------------------
// Status snapshot (telemetry)
// ---------------------------------------------------------------------------

/// What the controller reports for display after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub state: SortingState,
    pub presence: bool,
    pub last_color_label: Option<&'static str>,
    pub enabled: bool,
}

/// A routing decision made this tick in `BallDetected`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingDecision {
    pub color: TargetColor,
    pub confidence: f32,
    pub accepted: bool,
}

// ---------------------------------------------------------------------------
// SortContext
// ---------------------------------------------------------------------------

pub struct SortContext {
    // -- Timing --
    /// Host-supplied monotonic time of the current tick (ms).
    pub now_ms: u64,
    /// Time the current state was entered (ms).
    pub state_entered_at_ms: u64,

    // -- Sensor data --
    pub reading: SensorReading,
    pub presence: bool,
    /// Presence went false → true on this tick.
    pub rising_edge: bool,
    /// This tick's nearest match; `None` if the sample was unusable.
    pub classification: Option<ColorMatch>,

    // -- Classification history --
    pub last_color: Option<TargetColor>,
    pub last_confidence: Option<f32>,
    /// Set only on the tick a ball is routed.
    pub decision: Option<RoutingDecision>,

    // -- Actuator outputs --
    pub commands: ActuatorCommand,

    // -- Configuration --
    pub config: SorterConfig,
    pub matcher: ColorMatcher,
}

impl SortContext {
    pub fn new(config: SorterConfig, matcher: ColorMatcher) -> Self {
        Self {
            now_ms: 0,
            state_entered_at_ms: 0,
            reading: SensorReading::default(),
            presence: false,
            rising_edge: false,
            classification: None,
            last_color: None,
            last_confidence: None,
            decision: None,
            commands: ActuatorCommand::all_stop(),
            config,
            matcher,
        }
    }

    /// Milliseconds spent in the current state.  A clock that steps
    /// backwards reads as zero elapsed.
    pub fn ms_in_state(&self) -> u64 {
        self.now_ms.saturating_sub(self.state_entered_at_ms)
    }

    /// Record `m` as the latest classification.
    pub fn remember(&mut self, m: &ColorMatch) {
        self.last_color = Some(m.color);
        self.last_confidence = Some(m.confidence);
    }
}
