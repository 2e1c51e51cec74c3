//! Outbound application events.
//!
//! The [`SortService`](super::service::SortService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log to the console, write JSON lines,
//! publish to a dashboard.

use serde::Serialize;

use crate::fsm::SortingState;
use crate::fsm::context::StatusSnapshot;
use crate::sensors::color::TargetColor;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(SortingState),

    /// The FSM moved between states.
    StateChanged { from: SortingState, to: SortingState },

    /// A ball was classified with enough confidence to route it.
    BallClassified {
        color: TargetColor,
        confidence: f32,
        accepted: bool,
    },

    /// Operator enabled or disabled the sorter.
    EnabledChanged(bool),

    /// Per-tick telemetry.
    Telemetry(TelemetryData),
}

/// Everything the dashboard shows, captured once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub t_ms: u64,
    pub state: SortingState,
    pub presence: bool,
    pub last_color_label: Option<&'static str>,
    pub enabled: bool,

    pub proximity: u32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub last_confidence: Option<f32>,
    pub target_color: TargetColor,

    pub intake: f32,
    pub accept: f32,
    pub reject: f32,
}

impl TelemetryData {
    /// The core status view of this record.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state,
            presence: self.presence,
            last_color_label: self.last_color_label,
            enabled: self.enabled,
        }
    }
}
