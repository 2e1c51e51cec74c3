//! Actuator drivers.
//!
//! Thin wrappers over `embedded-hal` traits; the HAL of whatever board the
//! host runs on supplies the concrete PWM channels and pins.

pub mod motor;
