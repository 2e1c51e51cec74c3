//! Integration tests for the SortService → controller → actuators pipeline.

use crate::mock_hw::{ActuatorCall, BLUE, MockHardware, RED, RecordingSink};

use ballsort::app::commands::AppCommand;
use ballsort::app::events::{AppEvent, TelemetryData};
use ballsort::app::service::SortService;
use ballsort::{ConfigError, Error, Rgb, SorterConfig, SortingState, TargetColor};

const PERIOD: u64 = 20;

fn make_app() -> (SortService, MockHardware, RecordingSink) {
    let mut app = SortService::new(SorterConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn enabled_app() -> (SortService, MockHardware, RecordingSink) {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::Enable, &mut hw, &mut sink).unwrap();
    (app, hw, sink)
}

/// Tick every `PERIOD` ms from `from` while `now < until`.
fn run_until(
    app: &mut SortService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    from: u64,
    until: u64,
) -> Vec<TelemetryData> {
    (from..until)
        .step_by(PERIOD as usize)
        .map(|t| app.tick(hw, t, sink))
        .collect()
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_stops_motors_and_announces_idle() {
    let (app, hw, sink) = make_app();
    assert_eq!(hw.calls, vec![ActuatorCall::AllStop]);
    assert_eq!(sink.events, vec![AppEvent::Started(SortingState::Idle)]);
    assert!(!app.is_enabled());
}

#[test]
fn disabled_service_keeps_everything_stopped() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.place(500, BLUE);
    for t in run_until(&mut app, &mut hw, &mut sink, 0, 200) {
        assert_eq!(t.state, SortingState::Idle);
        assert!(!t.enabled);
        assert!(t.presence);
        assert_eq!((t.intake, t.accept, t.reject), (0.0, 0.0, 0.0));
    }
    assert_eq!(hw.duties(), (0.0, 0.0, 0.0));
}

// ── Full sort cycle ───────────────────────────────────────────

#[test]
fn blue_ball_full_cycle() {
    let (mut app, mut hw, mut sink) = enabled_app();

    // t=0: nothing on the sensor, intake runs.
    let t = app.tick(&mut hw, 0, &mut sink);
    assert_eq!(t.state, SortingState::Idle);
    assert_eq!(hw.duties(), (0.7, 0.0, 0.0));

    // t=20: ball arrives, everything stops while the colour is confirmed.
    hw.place(150, BLUE);
    let t = app.tick(&mut hw, 20, &mut sink);
    assert_eq!(t.state, SortingState::BallDetected);
    assert_eq!(t.last_color_label, Some("Blue"));
    assert_eq!(hw.duties(), (0.0, 0.0, 0.0));

    // t=40: confirmed, accept path runs.
    let t = app.tick(&mut hw, 40, &mut sink);
    assert_eq!(t.state, SortingState::RoutingToAccept);
    assert_eq!(hw.duties(), (0.0, 0.8, 0.0));
    assert!(sink.events.contains(&AppEvent::BallClassified {
        color: TargetColor::Blue,
        confidence: t.last_confidence.unwrap(),
        accepted: true,
    }));

    // Routing holds for the full sort duration.
    for t in run_until(&mut app, &mut hw, &mut sink, 60, 540) {
        assert_eq!(t.state, SortingState::RoutingToAccept, "left early at {}", t.t_ms);
        assert_eq!(t.accept, 0.8);
    }
    let t = app.tick(&mut hw, 540, &mut sink);
    assert_eq!(t.state, SortingState::Clearing);
    assert_eq!(hw.duties(), (0.0, 0.0, 0.0));

    // Ball still on the sensor: clearing waits however long it takes.
    for t in run_until(&mut app, &mut hw, &mut sink, 560, 1000) {
        assert_eq!(t.state, SortingState::Clearing);
    }

    // Gone: back to idle.
    hw.place(0, BLUE);
    let t = app.tick(&mut hw, 1000, &mut sink);
    assert_eq!(t.state, SortingState::Idle);
    assert_eq!(hw.duties(), (0.7, 0.0, 0.0));
}

#[test]
fn clearing_waits_for_clear_duration() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.tick(&mut hw, 0, &mut sink);
    hw.place(150, BLUE);
    app.tick(&mut hw, 20, &mut sink);
    app.tick(&mut hw, 40, &mut sink);
    hw.place(0, BLUE);
    run_until(&mut app, &mut hw, &mut sink, 60, 540);
    assert_eq!(app.tick(&mut hw, 540, &mut sink).state, SortingState::Clearing);

    // Ball already gone, but the clear window is 300 ms from 540.
    for t in run_until(&mut app, &mut hw, &mut sink, 560, 840) {
        assert_eq!(t.state, SortingState::Clearing);
    }
    assert_eq!(app.tick(&mut hw, 840, &mut sink).state, SortingState::Idle);
}

#[test]
fn wrong_colour_goes_to_reject() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.tick(&mut hw, 0, &mut sink);
    hw.place(150, RED);
    app.tick(&mut hw, 20, &mut sink);
    let t = app.tick(&mut hw, 40, &mut sink);
    assert_eq!(t.state, SortingState::RoutingToReject);
    assert_eq!(hw.duties(), (0.0, 0.0, 0.75));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::BallClassified {
            color: TargetColor::Red,
            accepted: false,
            ..
        }
    )));
}

#[test]
fn low_confidence_holds_in_ball_detected() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.tick(&mut hw, 0, &mut sink);
    // Far from every reference.
    hw.place(150, Rgb::new(0.9, 0.9, 0.9));
    for t in run_until(&mut app, &mut hw, &mut sink, 20, 2000) {
        assert_eq!(t.state, SortingState::BallDetected);
        assert_eq!((t.intake, t.accept, t.reject), (0.0, 0.0, 0.0));
    }
    assert!(
        !sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::BallClassified { .. }))
    );
}

#[test]
fn state_changes_are_reported_in_order() {
    let (mut app, mut hw, mut sink) = enabled_app();
    sink.clear();
    app.tick(&mut hw, 0, &mut sink);
    hw.place(150, BLUE);
    run_until(&mut app, &mut hw, &mut sink, 20, 560);
    hw.place(0, BLUE);
    run_until(&mut app, &mut hw, &mut sink, 560, 900);

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (SortingState::Idle, SortingState::BallDetected),
            (SortingState::BallDetected, SortingState::RoutingToAccept),
            (SortingState::RoutingToAccept, SortingState::Clearing),
            (SortingState::Clearing, SortingState::Idle),
        ]
    );
}

// ── Operator latch ────────────────────────────────────────────

#[test]
fn operator_request_applies_on_next_tick() {
    let (mut app, mut hw, mut sink) = make_app();
    let operator = app.operator();

    operator.request_enable();
    assert!(!app.is_enabled(), "latch must not act outside a tick");

    let t = app.tick(&mut hw, 0, &mut sink);
    assert!(t.enabled);
    assert_eq!(t.intake, 0.7);
    assert!(sink.events.contains(&AppEvent::EnabledChanged(true)));
}

#[test]
fn operator_disable_mid_routing_stops_motors() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.tick(&mut hw, 0, &mut sink);
    hw.place(150, BLUE);
    app.tick(&mut hw, 20, &mut sink);
    app.tick(&mut hw, 40, &mut sink);
    assert_eq!(app.state(), SortingState::RoutingToAccept);

    app.operator().request_disable();
    let t = app.tick(&mut hw, 60, &mut sink);
    assert_eq!(t.state, SortingState::Idle);
    assert!(!t.enabled);
    assert_eq!(hw.duties(), (0.0, 0.0, 0.0));
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: SortingState::RoutingToAccept,
        to: SortingState::Idle,
    }));
}

#[test]
fn reenable_with_ball_present_detects_it() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.place(150, BLUE);
    app.tick(&mut hw, 0, &mut sink);
    app.operator().request_enable();
    let t = app.tick(&mut hw, 20, &mut sink);
    assert_eq!(t.state, SortingState::BallDetected);
}

#[test]
fn enable_is_idempotent() {
    let (mut app, mut hw, mut sink) = enabled_app();
    sink.clear();
    app.handle_command(AppCommand::Enable, &mut hw, &mut sink).unwrap();
    assert!(sink.events.is_empty());
}

// ── Configuration commands ────────────────────────────────────

#[test]
fn set_target_changes_routing() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetTarget(TargetColor::Red), &mut hw, &mut sink)
        .unwrap();
    app.tick(&mut hw, 0, &mut sink);
    hw.place(150, RED);
    app.tick(&mut hw, 20, &mut sink);
    let t = app.tick(&mut hw, 40, &mut sink);
    assert_eq!(t.state, SortingState::RoutingToAccept);
    assert_eq!(t.target_color, TargetColor::Red);
}

#[test]
fn set_proximity_threshold_changes_presence() {
    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetProximityThreshold(400), &mut hw, &mut sink)
        .unwrap();
    hw.place(300, BLUE);
    let t = app.tick(&mut hw, 0, &mut sink);
    assert!(!t.presence);
    assert_eq!(t.state, SortingState::Idle);
}

/// Drive one ball of `color` from an idle start through to routing.
fn route_ball(
    app: &mut SortService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    color: Rgb,
) -> TelemetryData {
    hw.place(0, color);
    app.tick(hw, 0, sink);
    hw.place(150, color);
    app.tick(hw, 20, sink);
    app.tick(hw, 40, sink)
}

#[test]
fn confidence_threshold_command_gates_accept_path() {
    // 0.1 from the blue reference: confidence 0.9.
    let near_blue = Rgb::new(0.243, 0.427, 0.429);

    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetConfidenceThreshold(0.95), &mut hw, &mut sink)
        .unwrap();
    let t = route_ball(&mut app, &mut hw, &mut sink, near_blue);
    assert_eq!(t.state, SortingState::BallDetected);

    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetConfidenceThreshold(0.85), &mut hw, &mut sink)
        .unwrap();
    let t = route_ball(&mut app, &mut hw, &mut sink, near_blue);
    assert_eq!(t.state, SortingState::RoutingToAccept);
    assert_eq!(hw.duties(), (0.0, 0.8, 0.0));
}

#[test]
fn confidence_threshold_command_gates_reject_path() {
    // 0.1 from the red reference: confidence 0.9, not the target.
    let near_red = Rgb::new(0.561, 0.332, 0.114);

    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetConfidenceThreshold(0.95), &mut hw, &mut sink)
        .unwrap();
    let t = route_ball(&mut app, &mut hw, &mut sink, near_red);
    assert_eq!(t.state, SortingState::BallDetected);

    let (mut app, mut hw, mut sink) = enabled_app();
    app.handle_command(AppCommand::SetConfidenceThreshold(0.85), &mut hw, &mut sink)
        .unwrap();
    let t = route_ball(&mut app, &mut hw, &mut sink, near_red);
    assert_eq!(t.state, SortingState::RoutingToReject);
    assert_eq!(hw.duties(), (0.0, 0.0, 0.75));
}

#[test]
fn confidence_threshold_command_rejects_out_of_range() {
    let (mut app, mut hw, mut sink) = enabled_app();
    let err = app
        .handle_command(AppCommand::SetConfidenceThreshold(1.2), &mut hw, &mut sink)
        .unwrap_err();
    assert_eq!(err, Error::Config(ConfigError::OutOfRange("confidence_threshold")));
    assert_eq!(app.controller().config().confidence_threshold, 0.8);
}

#[test]
fn reenable_after_mid_cycle_disable_detects_ball() {
    let (mut app, mut hw, mut sink) = enabled_app();
    route_ball(&mut app, &mut hw, &mut sink, BLUE);
    assert_eq!(app.state(), SortingState::RoutingToAccept);

    app.operator().request_disable();
    run_until(&mut app, &mut hw, &mut sink, 60, 160);
    app.operator().request_enable();
    let t = app.tick(&mut hw, 160, &mut sink);
    assert_eq!(t.state, SortingState::BallDetected);
    assert_eq!(hw.duties(), (0.0, 0.0, 0.0));
}

#[test]
fn invalid_update_is_rejected_and_changes_nothing() {
    let (mut app, mut hw, mut sink) = enabled_app();
    let bad = SorterConfig {
        intake_speed: 1.5,
        ..SorterConfig::default()
    };
    let err = app
        .handle_command(AppCommand::UpdateConfig(bad), &mut hw, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::OutOfRange(_))));
    assert_eq!(app.controller().config().intake_speed, 0.7);
}

#[test]
fn calibrate_rejects_non_finite() {
    let (mut app, mut hw, mut sink) = enabled_app();
    let err = app.handle_command(
        AppCommand::Calibrate {
            color: TargetColor::Green,
            reference: Rgb::new(f32::NAN, 0.5, 0.2),
        },
        &mut hw,
        &mut sink,
    );
    assert!(err.is_err());
    assert_eq!(
        app.controller().config().profiles.green,
        SorterConfig::default().profiles.green
    );
}

#[test]
fn one_sensor_read_per_tick() {
    let (mut app, mut hw, mut sink) = enabled_app();
    run_until(&mut app, &mut hw, &mut sink, 0, 200);
    assert_eq!(hw.reads(), 10);
    assert_eq!(app.tick_count(), 10);
}
