use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sol_rs::actuator::ThreadDelay;
use sol_rs::adc::AdcChannel;
use sol_rs::data_log::{self, DataLog};
use sol_rs::servo::{BaseServo, TiltServo};
use sol_rs::{Config, Exploration, Tracker};

#[derive(Parser, Debug)]
#[command(version, about = "Points a two-axis solar panel at the sun by hill climbing on its output")]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Run a single cycle, log the data point and exit
    #[arg(long)]
    once: bool,
}

// Usage:
//  Startup: tilt to the initial angle (panel faces east), base stopped.
//  Every interval:
//   → exploit tilt and base until the base stops improving
//   → nothing improved: composite probe, then sweep if that fails too
//   → log tracker and baseline voltages, sleep
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;

    info!("Starting a new trial...");

    let tilt = TiltServo::new(&config.servo).context("opening tilt servo")?;
    let base = BaseServo::new(&config.servo).context("opening base servo")?;
    let sensor = AdcChannel::open(config.adc.tracker_channel, &config.adc)
        .context("opening tracker ADC channel")?;
    let mut baseline = AdcChannel::open(config.adc.baseline_channel, &config.adc)
        .context("opening baseline ADC channel")?;

    let mut data_log = config
        .logging
        .data_log
        .as_deref()
        .map(DataLog::open)
        .transpose()
        .context("opening data log")?;

    let mut tracker = Tracker::new(
        tilt,
        base,
        sensor,
        ThreadDelay,
        config.search.params(),
        config.schedule.initial_tilt_degrees,
    );
    tracker.home();

    let interval = config.schedule.interval();
    loop {
        let report = tracker.run_cycle();
        match report.exploration {
            Some(Exploration::Swept(sweep)) => {
                info!(angle = sweep.angle, sample = sweep.sample, "cycle ended with a sweep")
            }
            Some(Exploration::Relaunched { improved }) => {
                info!(improved, "cycle ended after a successful probe")
            }
            None => info!(improved = report.improved, "cycle ended in exploitation"),
        }

        let point = data_log::collect(tracker.sensor_mut(), &mut baseline);
        if let Some(log) = data_log.as_mut()
            && let Err(e) = log.append(&point)
        {
            warn!(path = %log.path().display(), "failed to append data point: {}", e);
        }

        if args.once {
            break;
        }
        info!(secs = interval.as_secs(), "sleeping until next cycle");
        thread::sleep(interval);
    }

    Ok(())
}
