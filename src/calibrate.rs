use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sol_rs::Config;
use sol_rs::adc::AdcChannel;
use sol_rs::calibration::{BASELINE, TRACKER};

#[derive(Parser, Debug)]
#[command(version, about = "Prints raw panel samples next to their calibrated voltage")]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Milliseconds between samples
    #[arg(short, long, default_value_t = 500)]
    period_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Panel Voltage Calibration Tool                   ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    println!("Instructions:");
    println!("1. Put a voltmeter across the open-circuit panel output");
    println!("2. Vary the light on both panels from dark to full sun");
    println!("3. Note the raw value each time the meter crosses a volt");
    println!("4. Copy the raw/volt pairs into the calibration tables");
    println!("5. Press Ctrl+C when done\n");

    let mut tracker = AdcChannel::open(config.adc.tracker_channel, &config.adc)
        .context("opening tracker ADC channel")?;
    let mut baseline = AdcChannel::open(config.adc.baseline_channel, &config.adc)
        .context("opening baseline ADC channel")?;

    let mut tracker_range = (i32::MAX, i32::MIN);
    let mut baseline_range = (i32::MAX, i32::MIN);
    let mut sample_count = 0u64;

    println!(
        "{:^8} | {:^22} | {:^22} | {:^20}",
        "Sample", "Tracker raw (V)", "Baseline raw (V)", "Raw ranges"
    );
    println!("{:-<8}-+-{:-<22}-+-{:-<22}-+-{:-<20}", "", "", "", "");

    loop {
        match (tracker.read(), baseline.read()) {
            (Ok(t), Ok(b)) => {
                tracker_range = (tracker_range.0.min(t), tracker_range.1.max(t));
                baseline_range = (baseline_range.0.min(b), baseline_range.1.max(b));
                sample_count += 1;

                println!(
                    "{:^8} | {:>6} ({:>6.2} V)      | {:>6} ({:>6.2} V)      | T {}-{}  B {}-{}",
                    sample_count,
                    t,
                    TRACKER.convert(t),
                    b,
                    BASELINE.convert(b),
                    tracker_range.0,
                    tracker_range.1,
                    baseline_range.0,
                    baseline_range.1
                );
            }
            (Err(e), _) | (_, Err(e)) => eprintln!("ADC read failed: {}", e),
        }

        thread::sleep(Duration::from_millis(args.period_ms));
    }
}
