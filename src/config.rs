use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TrackerError};

// ** SEARCH CONFIGURATION ** //

/// Tilt moves 3 degrees per step.
pub const TILT_STEP_DEGREES: i32 = 3;
/// A 50 ms base pulse turns the base roughly 5 degrees.
pub const BASE_PULSE_MS: u64 = 50;
/// Time for the panel output to settle after a move before sampling.
pub const SETTLE_MS: u64 = 1500;
/// Sweep covers +/- 30 degrees around the current tilt in 6 degree steps.
pub const SWEEP_RANGE_DEGREES: u32 = 30;
pub const SWEEP_STEP_DEGREES: u32 = 6;

// ** SCHEDULE CONFIGURATION ** //

/// Initial tilt, tracker panel faces east.
pub const INITIAL_TILT_DEGREES: i32 = 100;
/// 15 minutes between cycles.
pub const INTERVAL_SECS: u64 = 15 * 60;

// ** SERVO CONFIGURATION ** //

/// Hardware PWM is available on GPIO 12/18 (PWM0) and 13/19 (PWM1).
pub const TILT_PWM_PIN: u8 = 18;
pub const BASE_PWM_PIN: u8 = 13;
/// Standard hobby servo: 0..180 degrees over 544..2400 us at 50 Hz.
pub const SERVO_MIN_PULSE_US: f64 = 544.0;
pub const SERVO_MAX_PULSE_US: f64 = 2400.0;
pub const SERVO_FREQUENCY_HZ: f64 = 50.0;
pub const SERVO_MAX_ANGLE: i32 = 180;
/// Continuous rotation base servo speed settings, written as servo angles.
pub const BASE_CW_SPEED: i32 = 20;
pub const BASE_CCW_SPEED: i32 = 150;
pub const BASE_STOP: i32 = 90;

// ** ADC CONFIGURATION ** //

/// MCP3008 on SPI0 / CE0.
pub const SPI_CLOCK_HZ: u32 = 1_000_000;
pub const TRACKER_ADC_CHANNEL: u8 = 0;
pub const BASELINE_ADC_CHANNEL: u8 = 1;

/// PWM channel number behind a GPIO pin, if the pin has hardware PWM.
pub fn pwm_channel(pin: u8) -> Option<u8> {
    match pin {
        12 | 18 => Some(0),
        13 | 19 => Some(1),
        _ => None,
    }
}

const EMBEDDED_CONFIG: &str = include_str!("../config.toml.example");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub schedule: ScheduleConfig,
    pub servo: ServoConfig,
    pub adc: AdcConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tilt_step_degrees: i32,
    pub base_pulse_ms: u64,
    pub settle_ms: u64,
    pub sweep_range_degrees: u32,
    pub sweep_step_degrees: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tilt_step_degrees: TILT_STEP_DEGREES,
            base_pulse_ms: BASE_PULSE_MS,
            settle_ms: SETTLE_MS,
            sweep_range_degrees: SWEEP_RANGE_DEGREES,
            sweep_step_degrees: SWEEP_STEP_DEGREES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub initial_tilt_degrees: i32,
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            initial_tilt_degrees: INITIAL_TILT_DEGREES,
            interval_secs: INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    pub tilt_pin: u8,
    pub base_pin: u8,
    pub min_pulse_us: f64,
    pub max_pulse_us: f64,
    pub frequency_hz: f64,
    pub base_cw_speed: i32,
    pub base_ccw_speed: i32,
    pub base_stop: i32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            tilt_pin: TILT_PWM_PIN,
            base_pin: BASE_PWM_PIN,
            min_pulse_us: SERVO_MIN_PULSE_US,
            max_pulse_us: SERVO_MAX_PULSE_US,
            frequency_hz: SERVO_FREQUENCY_HZ,
            base_cw_speed: BASE_CW_SPEED,
            base_ccw_speed: BASE_CCW_SPEED,
            base_stop: BASE_STOP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdcConfig {
    pub spi_clock_hz: u32,
    pub tracker_channel: u8,
    pub baseline_channel: u8,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            spi_clock_hz: SPI_CLOCK_HZ,
            tracker_channel: TRACKER_ADC_CHANNEL,
            baseline_channel: BASELINE_ADC_CHANNEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// CSV file that receives one row per cycle. Disabled when unset.
    pub data_log: Option<String>,
}

/// Search tuning handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub tilt_step: i32,
    pub base_pulse: Duration,
    pub settle: Duration,
    pub sweep_range: u32,
    pub sweep_step: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchConfig::default().params()
    }
}

impl SearchConfig {
    pub fn params(&self) -> SearchParams {
        SearchParams {
            tilt_step: self.tilt_step_degrees,
            base_pulse: Duration::from_millis(self.base_pulse_ms),
            settle: Duration::from_millis(self.settle_ms),
            sweep_range: self.sweep_range_degrees,
            sweep_step: self.sweep_step_degrees,
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Load from `path` if it exists, otherwise fall back to the embedded
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            let config = Self::parse(&content)?;
            info!(path = %path.display(), "loaded configuration from file");
            config
        } else {
            let config = Self::parse(EMBEDDED_CONFIG)?;
            warn!(path = %path.display(), "config file not found, using embedded defaults");
            config
        };
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.tilt_step_degrees <= 0 {
            return Err(TrackerError::Config(
                "search.tilt_step_degrees must be positive".into(),
            ));
        }
        if search.sweep_step_degrees == 0 {
            return Err(TrackerError::Config(
                "search.sweep_step_degrees must be positive".into(),
            ));
        }
        if search.sweep_step_degrees > search.sweep_range_degrees {
            return Err(TrackerError::Config(format!(
                "search.sweep_step_degrees ({}) exceeds sweep_range_degrees ({})",
                search.sweep_step_degrees, search.sweep_range_degrees
            )));
        }
        if search.sweep_range_degrees > SERVO_MAX_ANGLE as u32 {
            return Err(TrackerError::Config(format!(
                "search.sweep_range_degrees ({}) exceeds servo travel ({})",
                search.sweep_range_degrees, SERVO_MAX_ANGLE
            )));
        }
        if self.servo.min_pulse_us >= self.servo.max_pulse_us {
            return Err(TrackerError::Config(
                "servo.min_pulse_us must be below servo.max_pulse_us".into(),
            ));
        }
        if self.servo.frequency_hz <= 0.0 {
            return Err(TrackerError::Config(
                "servo.frequency_hz must be positive".into(),
            ));
        }
        let period_us = 1_000_000.0 / self.servo.frequency_hz;
        if self.servo.max_pulse_us >= period_us {
            return Err(TrackerError::Config(format!(
                "servo.max_pulse_us ({}) must fit in the PWM period ({} us)",
                self.servo.max_pulse_us, period_us
            )));
        }
        let tilt = pwm_channel(self.servo.tilt_pin)
            .ok_or(TrackerError::InvalidPwmPin(self.servo.tilt_pin))?;
        let base = pwm_channel(self.servo.base_pin)
            .ok_or(TrackerError::InvalidPwmPin(self.servo.base_pin))?;
        if tilt == base {
            return Err(TrackerError::Config(format!(
                "servo.tilt_pin ({}) and servo.base_pin ({}) share PWM channel {}",
                self.servo.tilt_pin, self.servo.base_pin, tilt
            )));
        }
        for channel in [self.adc.tracker_channel, self.adc.baseline_channel] {
            if channel > 7 {
                return Err(TrackerError::InvalidAdcChannel(channel));
            }
        }
        Ok(())
    }
}
