use tracing::{debug, info};

use crate::actuator::{BaseAxis, Delay, PanelSensor, TiltAxis};
use crate::tracker::{Axis, Direction, Phase, SweepResult, Tracker};

impl<T, B, S, D> Tracker<T, B, S, D>
where
    T: TiltAxis,
    B: BaseAxis,
    S: PanelSensor,
    D: Delay,
{
    /// Fallback for when exploitation has stalled: try a joint base + tilt
    /// move and relaunch exploitation from there if it helped, otherwise
    /// sweep the tilt axis.
    pub fn explore(&mut self) {
        self.drive(Phase::Probing);
    }

    /// Clockwise base pulse plus one positive tilt step, evaluated once.
    pub(crate) fn composite_probe(&mut self) -> i32 {
        debug!("composite probe");
        self.step(Axis::Base, Direction::Positive);
        self.step(Axis::Tilt, Direction::Positive);
        self.evaluate()
    }

    /// Undo the composite probe in reverse order.
    pub(crate) fn backout_composite(&mut self) {
        self.backout(Axis::Tilt, Direction::Positive);
        self.backout(Axis::Base, Direction::Positive);
    }

    /// Brute force tilt scan around the current angle.
    ///
    /// Probes `origin + k` for `k` in `0..=range` by `step`, then `origin - k`
    /// for the same offsets, and parks the panel at the first angle with the
    /// highest sample. The best reading is overwritten with that sample even
    /// when it's lower than the reading before the sweep.
    pub fn sweep(&mut self) -> SweepResult {
        let origin = self.state.tilt_angle;
        let range = self.params().sweep_range;
        let step = self.params().sweep_step.max(1) as usize;
        info!(origin, range, "sweeping tilt");

        let mut best: Option<SweepResult> = None;
        for sign in [1, -1] {
            for offset in (0..=range).step_by(step) {
                let angle = origin + sign * offset as i32;
                self.command_tilt(angle);
                let sample = self.settle_and_sample();
                debug!(angle, sample, "sweep probe");
                if best.is_none_or(|b| sample > b.sample) {
                    best = Some(SweepResult { angle, sample });
                }
            }
        }

        // range/step always yield at least the origin probe
        let best = best.unwrap_or(SweepResult {
            angle: origin,
            sample: self.state.previous_v,
        });
        self.move_tilt(best.angle);
        self.state.previous_v = best.sample;
        info!(angle = best.angle, sample = best.sample, "sweep done");
        best
    }
}
