//! Concrete state handler functions and table builder.
//!
//! Each state is three plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[presence rising edge]──▶ BALL_DETECTED ──[confidence < threshold]──┐
//!   ▲                                   │      ▲                              │
//!   │                     [match == target] [match != target]  └──────────────┘
//!   │                                   ▼      ▼
//!   │                   ROUTING_TO_ACCEPT    ROUTING_TO_REJECT
//!   │                                   │      │
//!   │                              [sort_duration elapsed]
//!   │                                   ▼      ▼
//!   └──[clear_duration elapsed && !presence]── CLEARING
//! ```
//!
//! Every `on_enter` writes a complete command so the output of a tick
//! always belongs to the state the machine ends that tick in.

use super::context::{ActuatorCommand, RoutingDecision, SortContext};
use super::{SortingState, StateDescriptor};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per controller.
pub fn build_state_table() -> [StateDescriptor; SortingState::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: SortingState::Idle,
            name: "IDLE",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: BallDetected
        StateDescriptor {
            id: SortingState::BallDetected,
            name: "BALL_DETECTED",
            on_enter: Some(ball_detected_enter),
            on_exit: None,
            on_update: ball_detected_update,
        },
        // Index 2: RoutingToAccept
        StateDescriptor {
            id: SortingState::RoutingToAccept,
            name: "ROUTING_TO_ACCEPT",
            on_enter: Some(routing_to_accept_enter),
            on_exit: None,
            on_update: routing_to_accept_update,
        },
        // Index 3: RoutingToReject
        StateDescriptor {
            id: SortingState::RoutingToReject,
            name: "ROUTING_TO_REJECT",
            on_enter: Some(routing_to_reject_enter),
            on_exit: None,
            on_update: routing_to_reject_update,
        },
        // Index 4: Clearing
        StateDescriptor {
            id: SortingState::Clearing,
            name: "CLEARING",
            on_enter: Some(clearing_enter),
            on_exit: Some(clearing_exit),
            on_update: clearing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Outputs
// ═══════════════════════════════════════════════════════════════════════════

fn intake_only(ctx: &SortContext) -> ActuatorCommand {
    ActuatorCommand {
        intake: ctx.config.intake_speed,
        ..ActuatorCommand::all_stop()
    }
}

fn accept_only(ctx: &SortContext) -> ActuatorCommand {
    ActuatorCommand {
        accept: ctx.config.accept_speed,
        ..ActuatorCommand::all_stop()
    }
}

fn reject_only(ctx: &SortContext) -> ActuatorCommand {
    ActuatorCommand {
        reject: ctx.config.reject_speed,
        ..ActuatorCommand::all_stop()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: intake running, waiting for a ball
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SortContext) {
    ctx.commands = intake_only(ctx);
    info!("IDLE: intake at {:.2}, waiting for ball", ctx.config.intake_speed);
}

fn idle_update(ctx: &mut SortContext) -> Option<SortingState> {
    ctx.commands = intake_only(ctx);

    if !ctx.rising_edge {
        return None;
    }

    // Label from the edge sample; routing re-samples next tick.
    match ctx.classification {
        Some(m) => {
            ctx.remember(&m);
            info!(
                "IDLE: ball entered (proximity {}), colour {} at {:.2} confidence",
                ctx.reading.proximity, m.color, m.confidence
            );
        }
        None => info!(
            "IDLE: ball entered (proximity {}), colour sample unusable",
            ctx.reading.proximity
        ),
    }
    Some(SortingState::BallDetected)
}

// ═══════════════════════════════════════════════════════════════════════════
//  BALL_DETECTED state: everything stopped while the colour is confirmed
// ═══════════════════════════════════════════════════════════════════════════

fn ball_detected_enter(ctx: &mut SortContext) {
    ctx.commands = ActuatorCommand::all_stop();
}

fn ball_detected_update(ctx: &mut SortContext) -> Option<SortingState> {
    ctx.commands = ActuatorCommand::all_stop();

    let m = match ctx.classification {
        Some(m) if m.confidence >= ctx.config.confidence_threshold => m,
        Some(m) => {
            debug!(
                "BALL_DETECTED: {} at {:.2} < {:.2}, holding",
                m.color, m.confidence, ctx.config.confidence_threshold
            );
            return None;
        }
        None => return None,
    };

    ctx.remember(&m);
    let accepted = m.color == ctx.config.target_color;
    ctx.decision = Some(RoutingDecision {
        color: m.color,
        confidence: m.confidence,
        accepted,
    });

    if accepted {
        info!("BALL_DETECTED: {} matches target, routing to ACCEPT", m.color);
        Some(SortingState::RoutingToAccept)
    } else {
        info!(
            "BALL_DETECTED: {} is not {}, routing to REJECT",
            m.color, ctx.config.target_color
        );
        Some(SortingState::RoutingToReject)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ROUTING states: one sort path runs for sort_duration
// ═══════════════════════════════════════════════════════════════════════════

fn routing_to_accept_enter(ctx: &mut SortContext) {
    ctx.commands = accept_only(ctx);
}

fn routing_to_accept_update(ctx: &mut SortContext) -> Option<SortingState> {
    ctx.commands = accept_only(ctx);
    sort_finished(ctx)
}

fn routing_to_reject_enter(ctx: &mut SortContext) {
    ctx.commands = reject_only(ctx);
}

fn routing_to_reject_update(ctx: &mut SortContext) -> Option<SortingState> {
    ctx.commands = reject_only(ctx);
    sort_finished(ctx)
}

fn sort_finished(ctx: &SortContext) -> Option<SortingState> {
    (ctx.ms_in_state() >= u64::from(ctx.config.sort_duration_ms)).then_some(SortingState::Clearing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLEARING state: wait for the ball to leave the sensor
// ═══════════════════════════════════════════════════════════════════════════

fn clearing_enter(ctx: &mut SortContext) {
    ctx.commands = ActuatorCommand::all_stop();
}

fn clearing_exit(_ctx: &mut SortContext) {
    info!("CLEARING: ready for next ball");
}

fn clearing_update(ctx: &mut SortContext) -> Option<SortingState> {
    ctx.commands = ActuatorCommand::all_stop();

    if ctx.ms_in_state() >= u64::from(ctx.config.clear_duration_ms) && !ctx.presence {
        return Some(SortingState::Idle);
    }
    None
}
