//! Operator enable/disable latch.
//!
//! Button callbacks usually run in a different context from the periodic
//! loop.  They post requests here, lock-free, and the service applies the
//! most recent request at the start of its next tick, so operator input
//! never races an in-flight `tick`.
//!
//! ```text
//!  button callback ──▶ OperatorSwitch (atomic) ──▶ SortService::tick
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

const NONE: u8 = 0;
const ENABLE: u8 = 1;
const DISABLE: u8 = 2;

/// A pending operator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorRequest {
    Enable,
    Disable,
}

/// Single-slot, last-writer-wins request latch.
#[derive(Debug, Default)]
pub struct OperatorSwitch {
    pending: AtomicU8,
}

impl OperatorSwitch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(NONE),
        }
    }

    /// Request the sorter be enabled.  Safe from any thread.
    pub fn request_enable(&self) {
        self.pending.store(ENABLE, Ordering::Release);
    }

    /// Request the sorter be disabled.  Safe from any thread.
    pub fn request_disable(&self) {
        self.pending.store(DISABLE, Ordering::Release);
    }

    /// Take the pending request, leaving the latch empty.
    pub fn take(&self) -> Option<OperatorRequest> {
        match self.pending.swap(NONE, Ordering::AcqRel) {
            ENABLE => Some(OperatorRequest::Enable),
            DISABLE => Some(OperatorRequest::Disable),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != NONE
    }
}
