// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::actuator::{BaseAxis, Delay, PanelSensor, Rotation, TiltAxis};
use crate::config::SearchParams;
use crate::tracker::Tracker;

type Field = Box<dyn Fn(i32, i32) -> i32>;

#[derive(Default)]
struct RigState {
    tilt: i32,
    base_offset: i32,
    tilt_commands: Vec<i32>,
    pulses: Vec<Rotation>,
    waits: Vec<Duration>,
    samples: VecDeque<i32>,
    field: Option<Field>,
}

/// Simulated panel shared by mock tilt, base, sensor and delay handles.
///
/// The sensor returns scripted samples first, then falls back to a field
/// function of `(tilt angle, net base pulses)`, then to zero.
#[derive(Clone, Default)]
pub struct MockRig {
    state: Rc<RefCell<RigState>>,
}

pub type MockTracker = Tracker<MockTilt, MockBase, MockSensor, MockDelay>;

impl MockRig {
    pub fn with_samples(samples: &[i32]) -> Self {
        let rig = Self::default();
        rig.state.borrow_mut().samples = samples.iter().copied().collect();
        rig
    }

    pub fn set_field<F>(&self, field: F)
    where
        F: Fn(i32, i32) -> i32 + 'static,
    {
        self.state.borrow_mut().field = Some(Box::new(field));
    }

    /// A tracker at `tilt_angle` whose best reading is already `previous_v`.
    pub fn tracker(&self, tilt_angle: i32, previous_v: i32) -> MockTracker {
        self.tracker_with_params(tilt_angle, previous_v, SearchParams::default())
    }

    pub fn tracker_with_sweep(
        &self,
        tilt_angle: i32,
        previous_v: i32,
        range: u32,
        step: u32,
    ) -> MockTracker {
        let params = SearchParams {
            sweep_range: range,
            sweep_step: step,
            ..SearchParams::default()
        };
        self.tracker_with_params(tilt_angle, previous_v, params)
    }

    fn tracker_with_params(
        &self,
        tilt_angle: i32,
        previous_v: i32,
        params: SearchParams,
    ) -> MockTracker {
        self.state.borrow_mut().tilt = tilt_angle;
        let mut tracker = Tracker::new(
            MockTilt(self.clone()),
            MockBase(self.clone()),
            MockSensor(self.clone()),
            MockDelay(self.clone()),
            params,
            tilt_angle,
        );
        tracker.state.previous_v = previous_v;
        tracker
    }

    pub fn tilt_commands(&self) -> Vec<i32> {
        self.state.borrow().tilt_commands.clone()
    }

    pub fn pulses(&self) -> Vec<Rotation> {
        self.state.borrow().pulses.clone()
    }

    /// Clockwise pulses minus counterclockwise pulses.
    pub fn base_offset(&self) -> i32 {
        self.state.borrow().base_offset
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.state.borrow().waits.clone()
    }

    pub fn remaining_samples(&self) -> usize {
        self.state.borrow().samples.len()
    }
}

pub struct MockTilt(MockRig);

impl TiltAxis for MockTilt {
    fn set_angle(&mut self, angle: i32) {
        let mut state = self.0.state.borrow_mut();
        state.tilt = angle;
        state.tilt_commands.push(angle);
    }
}

pub struct MockBase(MockRig);

impl BaseAxis for MockBase {
    fn pulse(&mut self, rotation: Rotation, _duration: Duration) {
        let mut state = self.0.state.borrow_mut();
        state.base_offset += match rotation {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => -1,
        };
        state.pulses.push(rotation);
    }
}

pub struct MockSensor(MockRig);

impl PanelSensor for MockSensor {
    fn sample(&mut self) -> i32 {
        let mut state = self.0.state.borrow_mut();
        if let Some(sample) = state.samples.pop_front() {
            return sample;
        }
        match &state.field {
            Some(field) => field(state.tilt, state.base_offset),
            None => 0,
        }
    }
}

pub struct MockDelay(MockRig);

impl Delay for MockDelay {
    fn wait(&mut self, duration: Duration) {
        self.0.state.borrow_mut().waits.push(duration);
    }
}
