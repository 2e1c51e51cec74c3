//! Recorded log → replay adapter → service → JSON telemetry.

use ballsort::adapters::json_sink::JsonLinesSink;
use ballsort::adapters::replay::{ReplaySource, SampleReader};
use ballsort::app::service::SortService;
use ballsort::SorterConfig;

const LOG: &str = r#"
{"t_ms": 0,   "proximity": 0,   "color": {"r": 0.33, "g": 0.33, "b": 0.33}}
{"t_ms": 20,  "proximity": 150, "color": {"r": 0.143, "g": 0.427, "b": 0.429}}
{"t_ms": 40,  "proximity": 150, "color": {"r": 0.143, "g": 0.427, "b": 0.429}}
{"t_ms": 540, "proximity": 150, "color": {"r": 0.143, "g": 0.427, "b": 0.429}}
{"t_ms": 600, "proximity": 0,   "color": {"r": 0.33, "g": 0.33, "b": 0.33}}
{"t_ms": 840, "proximity": 0,   "color": {"r": 0.33, "g": 0.33, "b": 0.33}}
"#;

#[test]
fn replayed_log_produces_expected_states() {
    let mut app = SortService::new(SorterConfig::default()).unwrap();
    let mut src = ReplaySource::new(20);
    let mut sink = JsonLinesSink::new(Vec::new());
    app.start(&mut src, &mut sink);
    app.operator().request_enable();

    for sample in SampleReader::new(LOG.as_bytes()) {
        let now = src.feed(&sample.unwrap());
        app.tick(&mut src, now, &mut sink);
    }
    assert!(src.last_command().intake > 0.0);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let states: Vec<String> = out
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["state"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_eq!(
        states,
        [
            "IDLE",
            "BALL_DETECTED",
            "ROUTING_TO_ACCEPT",
            "CLEARING",
            "CLEARING",
            "IDLE"
        ]
    );
}
