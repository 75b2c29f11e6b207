use tracing::{debug, info};

use crate::actuator::{BaseAxis, Delay, PanelSensor, Rotation, TiltAxis};
use crate::config::SearchParams;
use crate::state::TrackerState;

/// The two actuated axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Tilt,
    Base,
}

/// Step direction along an axis. Positive is an increasing tilt angle or a
/// clockwise base pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Where the cycle driver is in its search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Exploiting,
    Probing,
    Sweeping,
}

/// Best tilt angle found by a sweep and the sample seen there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    pub angle: i32,
    pub sample: i32,
}

/// Which exploration branch ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exploration {
    /// The composite probe improved and exploitation was relaunched from it.
    Relaunched { improved: bool },
    /// The probe failed and was backed out; the sweep picked a new tilt.
    Swept(SweepResult),
}

/// Summary of one control cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the first round of exploitation improved either axis.
    pub improved: bool,
    pub exploration: Option<Exploration>,
}

/// Hill-climbing controller for a two-axis tracker.
///
/// Owns the actuators, the tracker panel sensor and the settle delay, and is
/// the only writer of [`TrackerState`].
pub struct Tracker<T, B, S, D> {
    tilt: T,
    base: B,
    sensor: S,
    delay: D,
    params: SearchParams,
    pub(crate) state: TrackerState,
}

impl<T, B, S, D> Tracker<T, B, S, D>
where
    T: TiltAxis,
    B: BaseAxis,
    S: PanelSensor,
    D: Delay,
{
    pub fn new(
        tilt: T,
        base: B,
        sensor: S,
        delay: D,
        params: SearchParams,
        tilt_angle: i32,
    ) -> Self {
        Self {
            tilt,
            base,
            sensor,
            delay,
            params,
            state: TrackerState::new(tilt_angle),
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// The tracker panel sensor, for data collection between cycles.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Command the tilt servo to the believed angle.
    pub fn home(&mut self) {
        info!(angle = self.state.tilt_angle, "moving tilt to start position");
        self.tilt.set_angle(self.state.tilt_angle);
    }

    /// One primitive move. Tilt moves update the believed angle whatever the
    /// outcome; base moves are a single timed pulse.
    pub fn step(&mut self, axis: Axis, direction: Direction) {
        match axis {
            Axis::Tilt => {
                let delta = match direction {
                    Direction::Positive => self.params.tilt_step,
                    Direction::Negative => -self.params.tilt_step,
                };
                self.move_tilt(self.state.tilt_angle + delta);
            }
            Axis::Base => {
                let rotation = match direction {
                    Direction::Positive => Rotation::Clockwise,
                    Direction::Negative => Rotation::CounterClockwise,
                };
                debug!(?rotation, "base pulse");
                self.base.pulse(rotation, self.params.base_pulse);
            }
        }
    }

    /// Undo exactly one earlier `step(axis, direction)`.
    pub fn backout(&mut self, axis: Axis, direction: Direction) {
        debug!(?axis, ?direction, "backing out");
        self.step(axis, direction.reverse());
    }

    pub(crate) fn move_tilt(&mut self, angle: i32) {
        debug!(angle, "tilt");
        self.command_tilt(angle);
        self.state.tilt_angle = angle;
    }

    /// Move the servo without touching the believed angle.
    pub(crate) fn command_tilt(&mut self, angle: i32) {
        self.tilt.set_angle(angle);
    }

    /// Settle, take one sample and compare it with the best so far. The best
    /// reading only moves on a strictly positive reward.
    pub fn evaluate(&mut self) -> i32 {
        let sample = self.settle_and_sample();
        let reward = sample - self.state.previous_v;
        debug!(sample, reward, "evaluated position");
        if reward > 0 {
            self.state.previous_v = sample;
        }
        reward
    }

    pub(crate) fn settle_and_sample(&mut self) -> i32 {
        self.delay.wait(self.params.settle);
        self.sensor.sample()
    }

    /// Run one control cycle: reset the baseline from a fresh sample, exploit,
    /// and explore if exploitation found nothing.
    pub fn run_cycle(&mut self) -> CycleReport {
        // The panel may have been repositioned since the last reading.
        self.state.previous_v = self.settle_and_sample();
        info!(previous_v = self.state.previous_v, "starting cycle");

        let report = self.drive(Phase::Exploiting);
        info!(state = %self.state, ?report, "cycle complete");
        report
    }

    pub(crate) fn drive(&mut self, start: Phase) -> CycleReport {
        let mut report = CycleReport::default();
        let mut probed = false;
        let mut phase = start;

        loop {
            debug!(?phase, "phase");
            phase = match phase {
                Phase::Idle => break,
                // A relaunch after a successful probe always ends the cycle.
                Phase::Exploiting if probed => {
                    let improved = self.run_exploit();
                    report.exploration = Some(Exploration::Relaunched { improved });
                    Phase::Idle
                }
                Phase::Exploiting => {
                    report.improved = self.run_exploit();
                    if report.improved {
                        Phase::Idle
                    } else {
                        Phase::Probing
                    }
                }
                Phase::Probing => {
                    probed = true;
                    info!(exploit_v = self.state.previous_v, "launching exploration");
                    if self.composite_probe() > 0 {
                        Phase::Exploiting
                    } else {
                        self.backout_composite();
                        Phase::Sweeping
                    }
                }
                Phase::Sweeping => {
                    report.exploration = Some(Exploration::Swept(self.sweep()));
                    Phase::Idle
                }
            };
        }

        if probed {
            info!(explore_v = self.state.previous_v, "exploration done");
        }
        report
    }
}
