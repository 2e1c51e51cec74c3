//! Colour-based ball sorter control library.
//!
//! Exposes the pure-logic modules for integration testing and offline
//! replay.  The control core (`sensors`, `fsm`, `controller`) performs no
//! I/O; hardware and output live behind the ports in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod operator;
pub mod sensors;

pub use config::SorterConfig;
pub use controller::SortController;
pub use error::{ConfigError, Error, Result};
pub use fsm::SortingState;
pub use fsm::context::{ActuatorCommand, StatusSnapshot};
pub use sensors::color::TargetColor;
pub use sensors::{Rgb, SensorReading};
