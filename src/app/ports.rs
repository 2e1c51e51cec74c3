//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SortService (domain)
//! ```
//!
//! Driven adapters (sensor, motors, event sinks) implement these traits.
//! The [`SortService`](super::service::SortService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Latest proximity and colour.  Must not block.
    fn read(&mut self) -> SensorReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the three motors.
/// Duty values are -1.0 to 1.0.
pub trait ActuatorPort {
    fn set_intake(&mut self, duty: f32);

    /// Accept path (towards the shooter).
    fn set_accept(&mut self, duty: f32);

    /// Reject path (ejector).
    fn set_reject(&mut self, duty: f32);

    /// Stop every motor.
    fn all_stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
