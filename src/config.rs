//! Sorter configuration parameters
//!
//! All tunable parameters for the sorting controller.  Values are supplied
//! by the host at construction (or via a reconfigure call) and are validated
//! there; nothing is clamped silently.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::color::{ProfileSet, TargetColor, validate_reference};

/// Core sorter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    // --- Detection ---
    /// Proximity counts above which a ball is considered present
    pub proximity_threshold: u32,
    /// Minimum match confidence (0.0-1.0) before a ball is routed
    pub confidence_threshold: f32,

    // --- Timing ---
    /// How long the accept or reject path runs (milliseconds)
    pub sort_duration_ms: u32,
    /// Minimum settle time before the next ball is accepted (milliseconds)
    pub clear_duration_ms: u32,
    /// Host scheduling period (milliseconds)
    pub tick_period_ms: u32,

    // --- Routing ---
    /// Colour routed to the accept path; everything else is rejected
    pub target_color: TargetColor,

    // --- Motor outputs (duty, -1.0 to 1.0) ---
    pub intake_speed: f32,
    pub accept_speed: f32,
    pub reject_speed: f32,

    // --- Classification ---
    /// Reference triples for RED, BLUE, GREEN, YELLOW
    pub profiles: ProfileSet,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            // Detection
            proximity_threshold: 100,
            confidence_threshold: 0.8,

            // Timing
            sort_duration_ms: 500,
            clear_duration_ms: 300,
            tick_period_ms: 20, // 50 Hz

            // Routing
            target_color: TargetColor::Blue,

            // Motors
            intake_speed: 0.7,
            accept_speed: 0.8,
            reject_speed: 0.75,

            profiles: ProfileSet::default(),
        }
    }
}

impl SorterConfig {
    /// Check every field.  Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.confidence_threshold.is_finite() {
            return Err(ConfigError::NotFinite("confidence_threshold"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::OutOfRange("confidence_threshold"));
        }

        if self.sort_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("sort_duration_ms"));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroDuration("tick_period_ms"));
        }

        for (name, speed) in [
            ("intake_speed", self.intake_speed),
            ("accept_speed", self.accept_speed),
            ("reject_speed", self.reject_speed),
        ] {
            if !speed.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
            if !(-1.0..=1.0).contains(&speed) {
                return Err(ConfigError::OutOfRange(name));
            }
        }

        for profile in self.profiles.profiles() {
            validate_reference(&profile.reference)?;
        }

        Ok(())
    }

    /// Parse JSON and validate it.  Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            log::warn!("config parse failed: {e}");
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }
}
