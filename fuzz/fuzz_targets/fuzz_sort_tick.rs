//! Fuzz target: `SortController::tick`
//!
//! Decodes the input into a stream of (time step, proximity, r, g, b)
//! records and runs them through an enabled controller.  Timestamps may
//! jump backwards.  The controller must never panic and every command must
//! stay in range with at most one sort path running.
//!
//! cargo fuzz run fuzz_sort_tick

#![no_main]

use ballsort::{Rgb, SensorReading, SortController, SorterConfig};
use libfuzzer_sys::fuzz_target;

const RECORD: usize = 2 + 4 + 4 * 3;

fn f32_at(b: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut ctl) = SortController::new(SorterConfig::default()) else {
        return;
    };
    ctl.enable();

    let mut now: u64 = 0;
    for rec in data.chunks_exact(RECORD) {
        // Signed step so the clock can go backwards.
        let step = i16::from_le_bytes([rec[0], rec[1]]);
        now = now.saturating_add_signed(i64::from(step));
        let proximity = u32::from_le_bytes([rec[2], rec[3], rec[4], rec[5]]);
        let color = Rgb::new(f32_at(rec, 6), f32_at(rec, 10), f32_at(rec, 14));

        let (cmd, status) = ctl.tick(SensorReading::new(proximity, color), now);

        for v in [cmd.intake, cmd.accept, cmd.reject] {
            assert!(v.is_finite() && (-1.0..=1.0).contains(&v));
        }
        assert!(cmd.accept == 0.0 || cmd.reject == 0.0);
        assert_eq!(status.state, ctl.state());
    }
});
