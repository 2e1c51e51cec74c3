//! Nearest-reference colour classification.
//!
//! A small, ordered table of [`ColorProfile`]s is searched linearly for the
//! reference triple closest (Euclidean) to the sensed colour.  Confidence is
//! `1 - distance`, floored at zero, so an exact reference hit scores 1.0.
//!
//! Registration order is significant: a later profile must be *strictly*
//! closer to displace an earlier one, so equidistant readings always resolve
//! to whichever colour was registered first (RED, BLUE, GREEN, YELLOW).

use core::fmt;
use core::str::FromStr;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use super::Rgb;
use crate::error::ConfigError;

/// Capacity of the profile table.
pub const MAX_PROFILES: usize = 4;

// ---------------------------------------------------------------------------
// TargetColor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl TargetColor {
    /// Every colour, in registration order.
    pub const ALL: [TargetColor; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    /// Human-readable label shown on the dashboard.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for TargetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised colour name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown colour '{}' (expected red, blue, green or yellow)", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for TargetColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// A named reference colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProfile {
    pub color: TargetColor,
    pub reference: Rgb,
}

/// Reference triples for the four built-in colours, as carried in config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSet {
    pub red: Rgb,
    pub blue: Rgb,
    pub green: Rgb,
    pub yellow: Rgb,
}

impl Default for ProfileSet {
    /// REV Color Sensor V3 calibration values.
    fn default() -> Self {
        Self {
            red: Rgb::new(0.561, 0.232, 0.114),
            blue: Rgb::new(0.143, 0.427, 0.429),
            green: Rgb::new(0.197, 0.561, 0.240),
            yellow: Rgb::new(0.361, 0.524, 0.113),
        }
    }
}

impl ProfileSet {
    pub fn get(&self, color: TargetColor) -> Rgb {
        match color {
            TargetColor::Red => self.red,
            TargetColor::Blue => self.blue,
            TargetColor::Green => self.green,
            TargetColor::Yellow => self.yellow,
        }
    }

    pub fn set(&mut self, color: TargetColor, reference: Rgb) {
        match color {
            TargetColor::Red => self.red = reference,
            TargetColor::Blue => self.blue = reference,
            TargetColor::Green => self.green = reference,
            TargetColor::Yellow => self.yellow = reference,
        }
    }

    /// Profiles in registration order.
    pub fn profiles(&self) -> [ColorProfile; 4] {
        TargetColor::ALL.map(|color| ColorProfile {
            color,
            reference: self.get(color),
        })
    }
}

/// Reject reference triples a sensor could never produce.
pub fn validate_reference(reference: &Rgb) -> Result<(), ConfigError> {
    if !reference.is_finite() {
        return Err(ConfigError::NotFinite("profile reference"));
    }
    let in_unit = |v: f32| (0.0..=1.0).contains(&v);
    if !(in_unit(reference.r) && in_unit(reference.g) && in_unit(reference.b)) {
        return Err(ConfigError::OutOfRange("profile reference"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Result of a nearest-match search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatch {
    pub color: TargetColor,
    /// 0.0 (far) – 1.0 (exact reference).
    pub confidence: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ColorMatcher {
    profiles: Vec<ColorProfile, MAX_PROFILES>,
}

impl ColorMatcher {
    /// An empty matcher; [`classify`](Self::classify) returns `None` until
    /// at least one profile is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the four built-in colours from `set`, in order.
    pub fn with_profiles(set: &ProfileSet) -> Result<Self, ConfigError> {
        let mut matcher = Self::new();
        for profile in set.profiles() {
            matcher.register(profile)?;
        }
        Ok(matcher)
    }

    /// Append a profile.  Later registrations lose ties.
    pub fn register(&mut self, profile: ColorProfile) -> Result<(), ConfigError> {
        validate_reference(&profile.reference)?;
        self.profiles
            .push(profile)
            .map_err(|_| ConfigError::TooManyProfiles)
    }

    /// Replace the reference triple for `color`, keeping its position.
    /// Registers it if absent.
    pub fn calibrate(&mut self, color: TargetColor, reference: Rgb) -> Result<(), ConfigError> {
        validate_reference(&reference)?;
        match self.profiles.iter_mut().find(|p| p.color == color) {
            Some(profile) => {
                profile.reference = reference;
                Ok(())
            }
            None => self.register(ColorProfile { color, reference }),
        }
    }

    pub fn profiles(&self) -> &[ColorProfile] {
        &self.profiles
    }

    /// Find the closest registered profile.
    ///
    /// Returns `None` for a non-finite sample or an empty table.
    pub fn classify(&self, sample: &Rgb) -> Option<ColorMatch> {
        if !sample.is_finite() {
            return None;
        }

        let mut best: Option<(TargetColor, f32)> = None;
        for profile in &self.profiles {
            let d = sample.distance(&profile.reference);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((profile.color, d)),
            }
        }

        best.map(|(color, distance)| ColorMatch {
            color,
            confidence: (1.0 - distance).clamp(0.0, 1.0),
            distance,
        })
    }
}
