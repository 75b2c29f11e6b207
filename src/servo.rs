use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

// Use rppal in production
#[cfg(not(test))]
use rppal::pwm::{Channel, Polarity, Pwm};

// Mock PWM for testing
#[cfg(test)]
use crate::mocks::mock_pwm::{Channel, Polarity, Pwm};

use crate::actuator::{BaseAxis, Rotation, TiltAxis};
use crate::config::{SERVO_MAX_ANGLE, ServoConfig, pwm_channel};
use crate::error::{Result, TrackerError};

/// Hardware PWM channel behind a GPIO pin.
fn channel_for_pin(pin: u8) -> Result<Channel> {
    match pwm_channel(pin) {
        Some(0) => Ok(Channel::Pwm0),
        Some(1) => Ok(Channel::Pwm1),
        _ => Err(TrackerError::InvalidPwmPin(pin)),
    }
}

/// A hobby servo on one hardware PWM channel, addressed in servo degrees.
struct ServoOutput {
    pwm: Pwm,
    pin: u8,
    min_pulse_us: f64,
    max_pulse_us: f64,
    frequency_hz: f64,
    enabled: bool,
}

impl ServoOutput {
    /// Opens the channel with the output disabled so the servo doesn't jump
    /// before the first command.
    fn open(pin: u8, config: &ServoConfig) -> Result<Self> {
        let channel = channel_for_pin(pin)?;
        let pwm = Pwm::with_frequency(channel, config.frequency_hz, 0.0, Polarity::Normal, false)?;
        Ok(Self {
            pwm,
            pin,
            min_pulse_us: config.min_pulse_us,
            max_pulse_us: config.max_pulse_us,
            frequency_hz: config.frequency_hz,
            enabled: false,
        })
    }

    /// Map an angle onto a duty cycle
    /// 0° → min pulse, 180° → max pulse, clamped outside that.
    fn duty_cycle(&self, angle: i32) -> f64 {
        let clamped = angle.clamp(0, SERVO_MAX_ANGLE) as f64;
        let pulse_us = self.min_pulse_us
            + (clamped / SERVO_MAX_ANGLE as f64) * (self.max_pulse_us - self.min_pulse_us);
        let period_us = 1_000_000.0 / self.frequency_hz;
        pulse_us / period_us
    }

    fn write(&mut self, angle: i32) -> Result<()> {
        self.pwm.set_duty_cycle(self.duty_cycle(angle))?;
        if !self.enabled {
            self.pwm.enable()?;
            self.enabled = true;
        }
        Ok(())
    }
}

impl Drop for ServoOutput {
    fn drop(&mut self) {
        // Ensure PWM is disabled when dropped
        let _ = self.pwm.disable();
    }
}

/// Positional servo driving the tilt axis.
pub struct TiltServo {
    output: ServoOutput,
}

impl TiltServo {
    pub fn new(config: &ServoConfig) -> Result<Self> {
        let output = ServoOutput::open(config.tilt_pin, config)?;
        info!(pin = config.tilt_pin, "tilt servo ready");
        Ok(Self { output })
    }
}

impl TiltAxis for TiltServo {
    fn set_angle(&mut self, angle: i32) {
        if let Err(e) = self.output.write(angle) {
            error!(pin = self.output.pin, angle, "tilt servo write failed: {}", e);
        }
    }
}

/// Continuous rotation servo driving the base axis. Speed is set by writing
/// a servo angle: `base_stop` holds still, values either side turn it.
pub struct BaseServo {
    output: ServoOutput,
    cw_speed: i32,
    ccw_speed: i32,
    stop: i32,
}

impl BaseServo {
    /// Opens the channel and parks the base at stop.
    pub fn new(config: &ServoConfig) -> Result<Self> {
        let mut output = ServoOutput::open(config.base_pin, config)?;
        output.write(config.base_stop)?;
        info!(pin = config.base_pin, "base servo ready");
        Ok(Self {
            output,
            cw_speed: config.base_cw_speed,
            ccw_speed: config.base_ccw_speed,
            stop: config.base_stop,
        })
    }

    fn write(&mut self, speed: i32) {
        if let Err(e) = self.output.write(speed) {
            error!(pin = self.output.pin, speed, "base servo write failed: {}", e);
        }
    }
}

impl BaseAxis for BaseServo {
    fn pulse(&mut self, rotation: Rotation, duration: Duration) {
        let speed = match rotation {
            Rotation::Clockwise => self.cw_speed,
            Rotation::CounterClockwise => self.ccw_speed,
        };
        debug!(?rotation, ?duration, "base pulse");
        self.write(speed);
        thread::sleep(duration);
        self.write(self.stop);
    }
}
