//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (operator
//! buttons, dashboard config writes, calibration) that the
//! [`SortService`](super::service::SortService) interprets and acts upon.

use crate::config::SorterConfig;
use crate::sensors::Rgb;
use crate::sensors::color::TargetColor;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start sorting.
    Enable,

    /// Stop every motor and return to Idle.
    Disable,

    /// Change which colour goes to the accept path ("Config/Target Color").
    SetTarget(TargetColor),

    /// Change the presence threshold ("Config/Proximity Threshold").
    SetProximityThreshold(u32),

    /// Change the minimum routing confidence ("Config/Confidence Threshold").
    SetConfidenceThreshold(f32),

    /// Replace one colour's reference triple.
    Calibrate { color: TargetColor, reference: Rgb },

    /// Hot-reload the whole configuration.
    UpdateConfig(SorterConfig),
}
