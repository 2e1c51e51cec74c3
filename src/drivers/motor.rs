//! Brushed motor driver over `embedded-hal` PWM + direction pin.
//!
//! Signed duty in, PWM magnitude and direction level out.  This driver is
//! a dumb actuator: it clamps whatever it is given to -1.0..=1.0 and
//! treats NaN as stop.  Range policy lives in config validation.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::error::MotorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorState {
    Stopped,
    Running { duty: f32, dir: Direction },
}

/// Anything that can be driven at a signed duty.
pub trait Motor {
    fn drive(&mut self, duty: f32) -> Result<(), MotorError>;

    fn stop(&mut self) -> Result<(), MotorError> {
        self.drive(0.0)
    }
}

pub struct DutyCycleMotor<P, D> {
    pwm: P,
    dir: D,
    inverted: bool,
    state: MotorState,
}

impl<P: SetDutyCycle, D: OutputPin> DutyCycleMotor<P, D> {
    pub fn new(pwm: P, dir: D) -> Self {
        Self {
            pwm,
            dir,
            inverted: false,
            state: MotorState::Stopped,
        }
    }

    /// Swap forward/reverse, for motors mounted the other way round.
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }

    /// Give the peripherals back.
    pub fn release(self) -> (P, D) {
        (self.pwm, self.dir)
    }

    fn set_direction_hw(&mut self, dir: Direction) -> Result<(), MotorError> {
        let forward = matches!(dir, Direction::Forward) != self.inverted;
        let written = if forward {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        written.map_err(|_| MotorError::DirectionWriteFailed)
    }

    fn set_duty_hw(&mut self, magnitude: f32) -> Result<(), MotorError> {
        let max = self.pwm.max_duty_cycle();
        let duty = (magnitude * f32::from(max)).round() as u16;
        self.pwm
            .set_duty_cycle(duty.min(max))
            .map_err(|_| MotorError::PwmWriteFailed)
    }
}

impl<P: SetDutyCycle, D: OutputPin> Motor for DutyCycleMotor<P, D> {
    fn drive(&mut self, duty: f32) -> Result<(), MotorError> {
        let duty = if duty.is_nan() { 0.0 } else { duty.clamp(-1.0, 1.0) };

        if duty == 0.0 {
            self.set_duty_hw(0.0)?;
            self.state = MotorState::Stopped;
            return Ok(());
        }

        let dir = if duty > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        // Cut power before flipping direction.
        if matches!(self.state, MotorState::Running { dir: current, .. } if current != dir) {
            self.set_duty_hw(0.0)?;
            self.state = MotorState::Stopped;
        }
        self.set_direction_hw(dir)?;
        self.set_duty_hw(duty.abs())?;
        self.state = MotorState::Running { duty, dir };
        Ok(())
    }
}
