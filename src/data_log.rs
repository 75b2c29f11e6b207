use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::actuator::PanelSensor;
use crate::calibration::{BASELINE, TRACKER};
use crate::error::Result;

const HEADER: &str = "timestamp,tracker_raw,baseline_raw,tracker_v,baseline_v";

/// One reading of both panels, taken after a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Local>,
    pub tracker_raw: i32,
    pub baseline_raw: i32,
    pub tracker_v: f32,
    pub baseline_v: f32,
}

impl DataPoint {
    pub fn from_raw(timestamp: DateTime<Local>, tracker_raw: i32, baseline_raw: i32) -> Self {
        Self {
            timestamp,
            tracker_raw,
            baseline_raw,
            tracker_v: TRACKER.convert(tracker_raw),
            baseline_v: BASELINE.convert(baseline_raw),
        }
    }

    /// Tracker gain over the fixed baseline panel, in volts.
    pub fn gain(&self) -> f32 {
        self.tracker_v - self.baseline_v
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{:.2},{:.2}",
            self.timestamp.to_rfc3339(),
            self.tracker_raw,
            self.baseline_raw,
            self.tracker_v,
            self.baseline_v
        )
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.tracker_v, self.baseline_v)
    }
}

/// Sample both panels and convert them with their calibration tables.
pub fn collect(tracker: &mut impl PanelSensor, baseline: &mut impl PanelSensor) -> DataPoint {
    let point = DataPoint::from_raw(Local::now(), tracker.sample(), baseline.sample());
    info!(
        tracker_v = point.tracker_v,
        baseline_v = point.baseline_v,
        gain = point.gain(),
        "collected data: {}",
        point
    );
    point
}

/// Append-only CSV log of data points.
pub struct DataLog {
    path: PathBuf,
    file: File,
}

impl DataLog {
    /// Open `path` for appending, writing the header if the file is new or
    /// empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", HEADER)?;
        }
        info!(path = %path.display(), "data log open");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, point: &DataPoint) -> Result<()> {
        writeln!(self.file, "{}", point.csv_row())?;
        self.file.flush()?;
        Ok(())
    }
}
