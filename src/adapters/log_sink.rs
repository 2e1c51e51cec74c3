//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the `log`
//! facade.  Telemetry goes out at `debug` since it arrives every tick.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                debug!(
                    "TELEM | t={}ms state={} | ball={} prox={} | rgb=({:.3},{:.3},{:.3}) | \
                     last={} conf={} | target={} | intake={:.2} accept={:.2} reject={:.2} | {}",
                    t.t_ms,
                    t.state,
                    if t.presence { "YES" } else { "NO" },
                    t.proximity,
                    t.red,
                    t.green,
                    t.blue,
                    t.last_color_label.unwrap_or("None"),
                    t.last_confidence.map_or_else(|| "-".to_owned(), |c| format!("{c:.2}")),
                    t.target_color,
                    t.intake,
                    t.accept,
                    t.reject,
                    if t.enabled { "ENABLED" } else { "DISABLED" },
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::BallClassified {
                color,
                confidence,
                accepted,
            } => {
                info!(
                    "SORT  | {} ({:.2}) -> {}",
                    color,
                    confidence,
                    if *accepted { "ACCEPT" } else { "REJECT" }
                );
            }
            AppEvent::EnabledChanged(on) => {
                info!("OPER  | sorter {}", if *on { "enabled" } else { "disabled" });
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
        }
    }
}
