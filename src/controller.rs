//! The ball-sorting controller.
//!
//! [`SortController`] is what the host's periodic loop calls: one
//! [`tick`](SortController::tick) per scheduling period with that period's
//! sensor reading and a monotonic timestamp.  It returns a complete
//! [`ActuatorCommand`] and a [`StatusSnapshot`] and never fails; every
//! check that can fail happens when configuration is supplied.
//!
//! ```text
//!  SensorReading ──▶ presence / edge ──▶ ┌──────────┐ ──▶ ActuatorCommand
//!                    classify colour ──▶ │   Fsm    │ ──▶ StatusSnapshot
//!          now_ms ─────────────────────▶ └──────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SorterConfig;
use crate::error::ConfigError;
use crate::fsm::context::{ActuatorCommand, RoutingDecision, SortContext, StatusSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, SortingState};
use crate::sensors::color::{ColorMatcher, TargetColor};
use crate::sensors::{ProximityDetector, Rgb, SampleGuard, SensorReading};

pub struct SortController {
    fsm: Fsm,
    ctx: SortContext,
    proximity: ProximityDetector,
    guard: SampleGuard,
    enabled: bool,
}

impl SortController {
    /// Validate `config` and build a controller in `Idle`, disabled.
    pub fn new(config: SorterConfig) -> Result<Self, ConfigError> {
        let matcher = checked_matcher(&config)?;
        let mut ctx = SortContext::new(config, matcher);
        let mut fsm = Fsm::new(build_state_table(), SortingState::Idle);
        fsm.start(&mut ctx);
        ctx.commands = ActuatorCommand::all_stop();

        Ok(Self {
            fsm,
            ctx,
            proximity: ProximityDetector::new(),
            guard: SampleGuard::new(),
            enabled: false,
        })
    }

    // ── Per-tick ──────────────────────────────────────────────

    /// Run one control cycle.
    ///
    /// While disabled this always yields an all-stop command and `Idle`,
    /// and leaves every other piece of state untouched.
    pub fn tick(&mut self, reading: SensorReading, now_ms: u64) -> (ActuatorCommand, StatusSnapshot) {
        let presence =
            ProximityDetector::presence(reading.proximity, self.ctx.config.proximity_threshold);

        if !self.enabled {
            self.force_idle();
            self.ctx.commands = ActuatorCommand::all_stop();
            return (self.ctx.commands, self.snapshot(presence));
        }

        self.ctx.now_ms = now_ms;
        self.ctx.reading = reading;
        self.ctx.presence = presence;
        self.ctx.rising_edge = self.proximity.rising_edge(presence);
        self.ctx.decision = None;
        self.ctx.classification = if self.guard.check(&reading.color) {
            self.ctx.matcher.classify(&reading.color)
        } else {
            None
        };

        self.fsm.tick(&mut self.ctx);
        self.proximity.commit(presence);

        if self.ctx.decision.is_none() && self.fsm.current_state() == SortingState::BallDetected {
            debug!("tick @{now_ms}ms: holding in BALL_DETECTED");
        }

        (self.ctx.commands, self.snapshot(presence))
    }

    // ── Operator control ──────────────────────────────────────

    /// Allow the machine to run from the next tick.  Idempotent.
    pub fn enable(&mut self) {
        if !self.enabled {
            info!("sorter enabled");
            self.enabled = true;
        }
    }

    /// Stop everything and drop back to `Idle` immediately.  Idempotent.
    ///
    /// Presence history is cleared, so a ball still on the sensor when the
    /// sorter is re-enabled is detected on the first enabled tick.
    pub fn disable(&mut self) {
        if self.enabled {
            info!("sorter disabled");
        }
        self.enabled = false;
        self.proximity.reset();
        self.force_idle();
        self.ctx.commands = ActuatorCommand::all_stop();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ── Configuration ─────────────────────────────────────────

    /// Swap in a new configuration.  The current state and timers are kept;
    /// on error nothing changes.
    pub fn reconfigure(&mut self, config: SorterConfig) -> Result<(), ConfigError> {
        let matcher = checked_matcher(&config)?;
        info!(
            "sorter reconfigured: target={} proximity>{} confidence>={:.2}",
            config.target_color, config.proximity_threshold, config.confidence_threshold
        );
        self.ctx.config = config;
        self.ctx.matcher = matcher;
        Ok(())
    }

    pub fn set_target(&mut self, target: TargetColor) {
        if self.ctx.config.target_color != target {
            info!("target colour {} -> {}", self.ctx.config.target_color, target);
            self.ctx.config.target_color = target;
        }
    }

    pub fn set_proximity_threshold(&mut self, threshold: u32) {
        info!("proximity threshold -> {threshold}");
        self.ctx.config.proximity_threshold = threshold;
    }

    /// Minimum confidence needed to route a ball.  Must be finite and in
    /// 0.0..=1.0; on error nothing changes.
    pub fn set_confidence_threshold(&mut self, threshold: f32) -> Result<(), ConfigError> {
        let candidate = SorterConfig {
            confidence_threshold: threshold,
            ..self.ctx.config.clone()
        };
        if let Err(e) = candidate.validate() {
            warn!("confidence threshold {threshold} rejected: {e}");
            return Err(e);
        }
        info!("confidence threshold -> {threshold:.2}");
        self.ctx.config.confidence_threshold = threshold;
        Ok(())
    }

    /// Replace the reference triple for one colour.
    pub fn calibrate(&mut self, color: TargetColor, reference: Rgb) -> Result<(), ConfigError> {
        if let Err(e) = self.ctx.matcher.calibrate(color, reference) {
            warn!("calibration of {color} to {reference:?} rejected: {e}");
            return Err(e);
        }
        self.ctx.config.profiles.set(color, reference);
        info!("calibrated {color} to {reference:?}");
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SortingState {
        self.fsm.current_state()
    }

    pub fn config(&self) -> &SorterConfig {
        &self.ctx.config
    }

    /// Last classified colour and its confidence.
    pub fn last_match(&self) -> Option<(TargetColor, f32)> {
        self.ctx.last_color.zip(self.ctx.last_confidence)
    }

    /// Routing decision made on the most recent tick, if any.
    pub fn decision(&self) -> Option<RoutingDecision> {
        self.ctx.decision
    }

    /// Last command produced.
    pub fn commands(&self) -> ActuatorCommand {
        self.ctx.commands
    }

    /// Non-finite colour samples seen so far.
    pub fn invalid_samples(&self) -> u32 {
        self.guard.invalid_samples()
    }

    // ── Internal ──────────────────────────────────────────────

    fn force_idle(&mut self) {
        self.ctx.decision = None;
        self.fsm.force_transition(SortingState::Idle, &mut self.ctx);
    }

    fn snapshot(&self, presence: bool) -> StatusSnapshot {
        StatusSnapshot {
            state: self.fsm.current_state(),
            presence,
            last_color_label: self.ctx.last_color.map(TargetColor::label),
            enabled: self.enabled,
        }
    }
}

/// Validate `config` and build its matcher, logging a rejection.
fn checked_matcher(config: &SorterConfig) -> Result<ColorMatcher, ConfigError> {
    config
        .validate()
        .and_then(|()| ColorMatcher::with_profiles(&config.profiles))
        .inspect_err(|e| warn!("configuration rejected: {e}"))
}
