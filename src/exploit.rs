use tracing::{debug, info};

use crate::actuator::{BaseAxis, Delay, PanelSensor, TiltAxis};
use crate::tracker::{Axis, Direction, Tracker};

impl<T, B, S, D> Tracker<T, B, S, D>
where
    T: TiltAxis,
    B: BaseAxis,
    S: PanelSensor,
    D: Delay,
{
    /// Greedy hill-climb along one axis.
    ///
    /// Climbs in the positive direction while the reward stays positive,
    /// otherwise undoes the first step and tries the negative direction. The
    /// last, failed step is always backed out. Returns `false` only when the
    /// first probe failed in both directions.
    pub fn exploit(&mut self, axis: Axis) -> bool {
        self.step(axis, Direction::Positive);
        if self.evaluate() > 0 {
            debug!(?axis, "continuing in positive direction");
            loop {
                self.step(axis, Direction::Positive);
                if self.evaluate() <= 0 {
                    break;
                }
            }
            self.backout(axis, Direction::Positive);
            return true;
        }

        self.backout(axis, Direction::Positive);
        debug!(?axis, "trying negative direction");
        let mut count = 0;
        loop {
            self.step(axis, Direction::Negative);
            let reward = self.evaluate();
            count += 1;
            if reward <= 0 {
                break;
            }
        }
        self.backout(axis, Direction::Negative);

        count != 1
    }

    pub fn exploit_tilt(&mut self) -> bool {
        self.exploit(Axis::Tilt)
    }

    pub fn exploit_base(&mut self) -> bool {
        self.exploit(Axis::Base)
    }

    /// Alternate tilt and base exploitation until the base stops improving.
    /// Only the base result decides whether to go another round.
    pub fn run_exploit(&mut self) -> bool {
        info!("launching exploitation");
        let mut improved = false;
        let mut rounds = 0;
        loop {
            rounds += 1;
            if self.exploit_tilt() {
                improved = true;
            }
            let base_improved = self.exploit_base();
            if base_improved {
                improved = true;
            }
            if !base_improved {
                break;
            }
        }
        info!(rounds, improved, "exploitation done");
        improved
    }
}
