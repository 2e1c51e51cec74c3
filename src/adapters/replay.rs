//! Recorded-sample replay adapter.
//!
//! Feeds a sensor log, one JSON object per line, through the normal port
//! boundary so thresholds and reference colours can be tuned offline:
//!
//! ```text
//! {"t_ms": 0,  "proximity": 12,  "color": {"r": 0.30, "g": 0.40, "b": 0.30}}
//! {"t_ms": 20, "proximity": 180, "color": {"r": 0.14, "g": 0.43, "b": 0.43}}
//! ```
//!
//! `t_ms` is optional; missing timestamps advance by the tick period.
//! Blank lines and lines starting with `#` are skipped.

use std::fmt;
use std::io::{self, BufRead};

use serde::Deserialize;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::fsm::context::ActuatorCommand;
use crate::sensors::{Rgb, SensorReading};

/// One recorded tick.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ReplaySample {
    #[serde(default)]
    pub t_ms: Option<u64>,
    pub proximity: u32,
    pub color: Rgb,
}

#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    Parse { line: usize, source: serde_json::Error },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "read failed: {e}"),
            Self::Parse { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

// ── Reader ────────────────────────────────────────────────────

/// Iterator over the samples in a JSON-lines log.
pub struct SampleReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> SampleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<ReplaySample, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ReplayError::Io(e))),
            };
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse {
                line: self.line_no,
                source,
            }));
        }
    }
}

// ── Source ────────────────────────────────────────────────────

/// Plays samples into the service and captures what it commands.
pub struct ReplaySource {
    current: SensorReading,
    last_command: ActuatorCommand,
    now_ms: Option<u64>,
    period_ms: u64,
}

impl ReplaySource {
    pub fn new(period_ms: u64) -> Self {
        Self {
            current: SensorReading::default(),
            last_command: ActuatorCommand::all_stop(),
            now_ms: None,
            period_ms,
        }
    }

    /// Load the next sample and return its timestamp.
    pub fn feed(&mut self, sample: &ReplaySample) -> u64 {
        let now = match (sample.t_ms, self.now_ms) {
            (Some(t), _) => t,
            (None, Some(prev)) => prev.saturating_add(self.period_ms),
            (None, None) => 0,
        };
        self.now_ms = Some(now);
        self.current = SensorReading::new(sample.proximity, sample.color);
        now
    }

    pub fn last_command(&self) -> ActuatorCommand {
        self.last_command
    }
}

impl SensorPort for ReplaySource {
    fn read(&mut self) -> SensorReading {
        self.current
    }
}

impl ActuatorPort for ReplaySource {
    fn set_intake(&mut self, duty: f32) {
        self.last_command.intake = duty;
    }

    fn set_accept(&mut self, duty: f32) {
        self.last_command.accept = duty;
    }

    fn set_reject(&mut self, duty: f32) {
        self.last_command.reject = duty;
    }

    fn all_stop(&mut self) {
        self.last_command = ActuatorCommand::all_stop();
    }
}
