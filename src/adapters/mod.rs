//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                     |
//! |-------------|--------------------|---------------------------------|
//! | `hardware`  | ActuatorPort       | three `embedded-hal` motors     |
//! | `log_sink`  | EventSink          | `log` facade                    |
//! | `json_sink` | EventSink          | any `io::Write`, JSON lines     |
//! | `replay`    | SensorPort         | recorded sensor samples         |
//! |             | ActuatorPort       | last-command capture            |
//! | `time`      | -                  | monotonic host clock            |

pub mod hardware;
pub mod json_sink;
pub mod log_sink;
pub mod replay;
pub mod time;
