//! Unified error types for the sorter.
//!
//! The controller itself never fails at run time: every fallible path is a
//! configuration boundary ([`ConfigError`]) or a hardware driver write
//! ([`MotorError`]).  Both funnel into [`Error`] so callers above the
//! controller can use a single `?` chain.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration was rejected at a configuration boundary.
    Config(ConfigError),
    /// A motor driver write failed.
    Motor(MotorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Motor(e) => write!(f, "motor: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Why a [`SorterConfig`](crate::config::SorterConfig) (or a piece of one)
/// was refused.  The `&'static str` names the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A floating-point field was NaN or infinite.
    NotFinite(&'static str),
    /// A field was outside its permitted range.
    OutOfRange(&'static str),
    /// A duration that must be positive was zero.
    ZeroDuration(&'static str),
    /// The profile table has no free slot.
    TooManyProfiles,
    /// Config text could not be parsed.
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite(field) => write!(f, "{field} must be finite"),
            Self::OutOfRange(field) => write!(f, "{field} out of range"),
            Self::ZeroDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::TooManyProfiles => write!(f, "colour profile table is full"),
            Self::Parse => write!(f, "config could not be parsed"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Motor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Direction pin write failed.
    DirectionWriteFailed,
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::DirectionWriteFailed => write!(f, "direction pin write failed"),
        }
    }
}

impl std::error::Error for MotorError {}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Self::Motor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
