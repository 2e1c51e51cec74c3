//! Application core: pure domain logic, zero I/O.
//!
//! Wraps the [`SortController`](crate::controller::SortController) in a
//! service that talks to the outside world only through the **port traits**
//! in [`ports`], so the whole pipeline runs on the host against mocks.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
