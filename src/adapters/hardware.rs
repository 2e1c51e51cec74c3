//! Hardware adapter: bridges the three sorting motors to [`ActuatorPort`].
//!
//! Driver failures are logged and the adapter carries on; a flaky PWM
//! write must not take down the control loop.  Repeated failures on the
//! same channel log once until that channel succeeds again.

use log::{info, warn};

use crate::app::ports::ActuatorPort;
use crate::drivers::motor::Motor;
use crate::error::MotorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Intake = 0,
    Accept = 1,
    Reject = 2,
}

impl Channel {
    fn name(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

/// Intake, accept-path and reject-path motors behind one port.
pub struct MotorBank<I, A, R> {
    intake: I,
    accept: A,
    reject: R,
    failing: [bool; 3],
    failures: u32,
}

impl<I: Motor, A: Motor, R: Motor> MotorBank<I, A, R> {
    pub fn new(intake: I, accept: A, reject: R) -> Self {
        Self {
            intake,
            accept,
            reject,
            failing: [false; 3],
            failures: 0,
        }
    }

    /// Driver errors seen since construction.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn into_parts(self) -> (I, A, R) {
        (self.intake, self.accept, self.reject)
    }

    fn record(&mut self, channel: Channel, result: Result<(), MotorError>) {
        let slot = &mut self.failing[channel as usize];
        match result {
            Ok(()) => {
                if *slot {
                    info!("{} motor recovered", channel.name());
                    *slot = false;
                }
            }
            Err(e) => {
                if !*slot {
                    warn!("{} motor: {e}", channel.name());
                    *slot = true;
                }
                self.failures = self.failures.saturating_add(1);
            }
        }
    }
}

impl<I: Motor, A: Motor, R: Motor> ActuatorPort for MotorBank<I, A, R> {
    fn set_intake(&mut self, duty: f32) {
        let r = self.intake.drive(duty);
        self.record(Channel::Intake, r);
    }

    fn set_accept(&mut self, duty: f32) {
        let r = self.accept.drive(duty);
        self.record(Channel::Accept, r);
    }

    fn set_reject(&mut self, duty: f32) {
        let r = self.reject.drive(duty);
        self.record(Channel::Reject, r);
    }

    fn all_stop(&mut self) {
        let r = self.intake.stop();
        self.record(Channel::Intake, r);
        let r = self.accept.stop();
        self.record(Channel::Accept, r);
        let r = self.reject.stop();
        self.record(Channel::Reject, r);
    }
}
