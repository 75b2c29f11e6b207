use std::fmt;

/// What the controller believes about the panel.
///
/// `tilt_angle` follows every commanded tilt move and is never read back.
/// `previous_v` is the raw sample at the best position visited so far. It
/// only rises through a positive reward, except for the cycle reset and the
/// sweep which overwrite it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerState {
    pub tilt_angle: i32,
    pub previous_v: i32,
}

impl TrackerState {
    pub fn new(tilt_angle: i32) -> Self {
        Self {
            tilt_angle,
            previous_v: 0,
        }
    }
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tilt {}°, best sample {}", self.tilt_angle, self.previous_v)
    }
}
