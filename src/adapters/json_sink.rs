//! JSON-lines telemetry sink.
//!
//! Writes one [`TelemetryData`](crate::app::events::TelemetryData) object
//! per line to any `io::Write`.  Other events are left to the log sink.
//! The first write error is kept and further output is dropped, so a
//! closed pipe never disturbs the control loop.

use std::io::{self, Write};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct JsonLinesSink<W: Write> {
    out: W,
    lines: u64,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: 0,
            error: None,
        }
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// The first I/O error, if any.  Clears it.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        let AppEvent::Telemetry(t) = event else {
            return;
        };
        if self.error.is_some() {
            return;
        }
        let written = serde_json::to_writer(&mut self.out, t)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        match written {
            Ok(()) => self.lines += 1,
            Err(e) => {
                log::warn!("telemetry output failed: {e}");
                self.error = Some(e);
            }
        }
    }
}
