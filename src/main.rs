//! Offline replay of recorded sorter sensor logs.
//!
//! Feeds a JSON-lines sample log through the same [`SortService`] the robot
//! runs, and writes one telemetry line per tick to stdout.  Used to tune
//! thresholds and reference colours without the hardware.
//!
//! # Usage
//!
//! ```bash
//! ballsort-replay --input run.jsonl
//! ballsort-replay --config sorter.json --target red < run.jsonl
//! RUST_LOG=debug ballsort-replay --input run.jsonl --period-ms 10 > telemetry.jsonl
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use ballsort::adapters::json_sink::JsonLinesSink;
use ballsort::adapters::log_sink::LogEventSink;
use ballsort::adapters::replay::{ReplaySource, SampleReader};
use ballsort::adapters::time::MonotonicClock;
use ballsort::app::events::AppEvent;
use ballsort::app::ports::EventSink;
use ballsort::app::service::SortService;
use ballsort::{SorterConfig, TargetColor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sample log, one JSON object per line (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sorter configuration (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the target colour (red, blue, green, yellow)
    #[arg(short, long)]
    target: Option<TargetColor>,

    /// Tick period used for samples without a timestamp
    #[arg(long)]
    period_ms: Option<u32>,

    /// Leave the sorter disabled (motors stay stopped)
    #[arg(long)]
    start_disabled: bool,
}

/// Telemetry to stdout, everything else to the log, plus a tally.
struct ReplaySink<W: io::Write> {
    json: JsonLinesSink<W>,
    log: LogEventSink,
    accepted: u32,
    rejected: u32,
}

impl<W: io::Write> EventSink for ReplaySink<W> {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::BallClassified { accepted, .. } = event {
            if *accepted {
                self.accepted += 1;
            } else {
                self.rejected += 1;
            }
        }
        self.log.emit(event);
        self.json.emit(event);
    }
}

fn load_config(args: &Args) -> Result<SorterConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SorterConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SorterConfig::default(),
    };
    if let Some(target) = args.target {
        config.target_color = target;
    }
    if let Some(period) = args.period_ms {
        config.tick_period_ms = period;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let period = u64::from(config.tick_period_ms);
    let source_name = args
        .input
        .as_ref()
        .map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
    info!(
        "replaying {} (target={}, period={}ms)",
        source_name, config.target_color, period
    );

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let clock = MonotonicClock::new();

    let mut service = SortService::new(config)?;
    let mut source = ReplaySource::new(period);
    let mut sink = ReplaySink {
        json: JsonLinesSink::new(io::stdout().lock()),
        log: LogEventSink::new(),
        accepted: 0,
        rejected: 0,
    };

    service.start(&mut source, &mut sink);
    if !args.start_disabled {
        service.operator().request_enable();
    }

    for sample in SampleReader::new(input) {
        let sample = sample.with_context(|| format!("reading {source_name}"))?;
        let now_ms = source.feed(&sample);
        service.tick(&mut source, now_ms, &mut sink);
        if let Some(e) = sink.json.take_error() {
            bail!("writing telemetry: {e}");
        }
    }
    sink.json.flush().context("flushing telemetry")?;

    info!(
        "replay finished in {}ms: {} ticks, {} accepted, {} rejected, final state {}",
        clock.uptime_ms(),
        service.tick_count(),
        sink.accepted,
        sink.rejected,
        service.state()
    );
    Ok(())
}
