//! Pre-calibrated mappings between raw ADC samples and open-circuit panel
//! voltage. Only used for data logging; the search loop works on raw samples.

pub const TABLE_LEN: usize = 14;

/// A piecewise-linear calibration curve with strictly increasing breakpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTable {
    pub breakpoints: [i32; TABLE_LEN],
    pub voltages: [f32; TABLE_LEN],
}

/// Tracker (moving) panel.
pub const TRACKER: CalibrationTable = CalibrationTable {
    breakpoints: [3, 4, 7, 10, 16, 34, 65, 129, 297, 569, 665, 727, 797, 827],
    voltages: [
        4.02, 5.01, 6.01, 7.02, 8.00, 9.05, 10.01, 11.01, 12.01, 12.99, 14.01, 14.99, 16.02, 16.51,
    ],
};

/// Baseline (fixed) panel.
pub const BASELINE: CalibrationTable = CalibrationTable {
    breakpoints: [15, 22, 29, 44, 68, 99, 140, 250, 436, 601, 691, 748, 806, 838],
    voltages: [
        4.04, 5.02, 6.00, 7.01, 8.01, 9.00, 10.01, 11.00, 12.01, 12.97, 14.00, 15.00, 16.01, 16.50,
    ],
};

impl CalibrationTable {
    /// Convert a raw sample to volts.
    ///
    /// Samples at or below the first breakpoint clamp to the first voltage,
    /// samples above the last clamp to the last voltage. Anything in between
    /// is interpolated between the enclosing breakpoints.
    pub fn convert(&self, raw: i32) -> f32 {
        match self.breakpoints.iter().position(|&bp| raw <= bp) {
            Some(0) => self.voltages[0],
            None => self.voltages[TABLE_LEN - 1],
            Some(i) => {
                let (lo_raw, hi_raw) = (self.breakpoints[i - 1], self.breakpoints[i]);
                let (lo_v, hi_v) = (self.voltages[i - 1], self.voltages[i]);
                let ratio = (hi_v - lo_v) / (hi_raw - lo_raw) as f32;
                lo_v + ratio * (raw - lo_raw) as f32
            }
        }
    }
}
