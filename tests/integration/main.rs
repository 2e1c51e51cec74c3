//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the sorter against mock
//! adapters.  Everything runs on the host with no hardware.

mod mock_hw;
mod replay_tests;
mod sort_service_tests;
