//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                       │
//! │  ┌───────────────────┬──────────┬──────────┬───────────────────┐  │
//! │  │ SortingState      │ on_enter │ on_exit  │ on_update         │  │
//! │  ├───────────────────┼──────────┼──────────┼───────────────────┤  │
//! │  │ Idle              │ fn(ctx)  │ -        │ fn(ctx)->Option<> │  │
//! │  │ BallDetected      │ fn(ctx)  │ -        │ fn(ctx)->Option<> │  │
//! │  │ RoutingToAccept   │ fn(ctx)  │ -        │ fn(ctx)->Option<> │  │
//! │  │ RoutingToReject   │ fn(ctx)  │ -        │ fn(ctx)->Option<> │  │
//! │  │ Clearing          │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  └───────────────────┴──────────┴──────────┴───────────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! state, stamps `state_entered_at_ms`, then runs `on_enter` for the next.
//! At most one transition happens per tick.

pub mod context;
pub mod states;

use core::fmt;

use context::SortContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all sorter states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SortingState {
    Idle = 0,
    BallDetected = 1,
    RoutingToAccept = 2,
    RoutingToReject = 3,
    Clearing = 4,
}

impl SortingState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `SortingState`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::BallDetected,
            2 => Self::RoutingToAccept,
            3 => Self::RoutingToReject,
            4 => Self::Clearing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::BallDetected => "BALL_DETECTED",
            Self::RoutingToAccept => "ROUTING_TO_ACCEPT",
            Self::RoutingToReject => "ROUTING_TO_REJECT",
            Self::Clearing => "CLEARING",
        }
    }
}

impl fmt::Display for SortingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SortContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut SortContext) -> Option<SortingState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: SortingState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the current-state index.  All mutable data the
/// handlers touch lives in the [`SortContext`] passed to each call.
pub struct Fsm {
    /// Fixed-size table indexed by `SortingState as usize`.
    table: [StateDescriptor; SortingState::COUNT],
    current: usize,
    transition_count: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; SortingState::COUNT], initial: SortingState) -> Self {
        Self {
            table,
            current: initial as usize,
            transition_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    pub fn start(&mut self, ctx: &mut SortContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_entered_at_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.  `ctx.now_ms` and the sensor fields must
    /// already hold this tick's values.
    pub fn tick(&mut self, ctx: &mut SortContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition, bypassing `on_update`.
    /// A no-op if already in `next`.
    pub fn force_transition(&mut self, next: SortingState, ctx: &mut SortContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> SortingState {
        SortingState::from_index(self.current)
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: SortingState, ctx: &mut SortContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transition_count = self.transition_count.wrapping_add(1);
        ctx.state_entered_at_ms = ctx.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
