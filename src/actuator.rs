use std::thread;
use std::time::Duration;

/// Direction of a base pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Positional tilt actuator. Commands are absolute angles and there is no
/// readback; clamping to mechanical travel happens inside the driver.
pub trait TiltAxis {
    fn set_angle(&mut self, angle: i32);
}

/// Open-loop base actuator. A pulse turns the base for `duration` and then
/// stops it. The base position can't be queried, so callers undo a pulse
/// with an equal pulse the other way.
pub trait BaseAxis {
    fn pulse(&mut self, rotation: Rotation, duration: Duration);
}

/// A panel voltage sensor returning raw ADC samples.
pub trait PanelSensor {
    fn sample(&mut self) -> i32;
}

/// Blocking wait used for settle delays.
pub trait Delay {
    fn wait(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn wait(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
