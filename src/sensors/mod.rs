//! Sensor-side value types and the small amount of state derived from them.
//!
//! The colour/proximity sensor itself is owned by the host; each tick it
//! hands the controller a [`SensorReading`] by value.  This module turns
//! that snapshot into presence (with rising-edge detection) and tracks
//! whether the colour channel is currently producing usable numbers.

pub mod color;

use log::{info, warn};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// Normalised red/green/blue reflectance, each component nominally 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// True if no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Rgb) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

// ---------------------------------------------------------------------------
// SensorReading
// ---------------------------------------------------------------------------

/// One tick's worth of colour-sensor data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// Raw proximity counts; larger = closer.
    pub proximity: u32,
    /// Normalised colour.
    pub color: Rgb,
}

impl SensorReading {
    pub const fn new(proximity: u32, color: Rgb) -> Self {
        Self { proximity, color }
    }
}

// ---------------------------------------------------------------------------
// Proximity / presence
// ---------------------------------------------------------------------------

/// Derives object presence from proximity and detects its rising edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityDetector {
    last_presence: bool,
}

impl ProximityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when an object is in range.
    pub fn presence(proximity: u32, threshold: u32) -> bool {
        proximity > threshold
    }

    /// `true` only on the tick presence goes false → true.
    pub fn rising_edge(&self, presence: bool) -> bool {
        presence && !self.last_presence
    }

    /// Remember this tick's presence for the next edge check.
    pub fn commit(&mut self, presence: bool) {
        self.last_presence = presence;
    }

    /// Forget the last presence, so an object already in range reads as
    /// a fresh arrival on the next check.
    pub fn reset(&mut self) {
        self.last_presence = false;
    }
}

// ---------------------------------------------------------------------------
// Sample guard
// ---------------------------------------------------------------------------

/// Tracks non-finite colour samples.
///
/// Logging is edge-triggered: one warning when the sensor starts producing
/// garbage and one info line when it recovers, regardless of tick rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleGuard {
    faulted: bool,
    invalid_samples: u32,
}

impl SampleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the colour is usable for classification.
    pub fn check(&mut self, color: &Rgb) -> bool {
        if color.is_finite() {
            if self.faulted {
                info!(
                    "colour sensor recovered after {} invalid sample(s)",
                    self.invalid_samples
                );
                self.faulted = false;
            }
            true
        } else {
            if !self.faulted {
                warn!("colour sensor returned non-finite sample {color:?}, skipping classification");
                self.faulted = true;
            }
            self.invalid_samples = self.invalid_samples.saturating_add(1);
            false
        }
    }

    /// Total invalid samples seen since construction.
    pub fn invalid_samples(&self) -> u32 {
        self.invalid_samples
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }
}
