// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;

use rppal::pwm::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pwm0,
    Pwm1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
}

#[derive(Debug, Default)]
struct ChannelState {
    frequency: f64,
    duty_history: Vec<f64>,
    enabled: bool,
}

thread_local! {
    static MOCK_PWM: RefCell<HashMap<Channel, ChannelState>> = RefCell::new(HashMap::new());
}

pub struct Pwm {
    channel: Channel,
}

impl Pwm {
    pub fn with_frequency(
        channel: Channel,
        frequency: f64,
        duty_cycle: f64,
        _polarity: Polarity,
        enabled: bool,
    ) -> Result<Self, Error> {
        MOCK_PWM.with(|pwm| {
            pwm.borrow_mut().insert(
                channel,
                ChannelState {
                    frequency,
                    duty_history: vec![duty_cycle],
                    enabled,
                },
            );
        });
        Ok(Pwm { channel })
    }

    pub fn set_duty_cycle(&self, duty_cycle: f64) -> Result<(), Error> {
        MOCK_PWM.with(|pwm| {
            pwm.borrow_mut()
                .entry(self.channel)
                .or_default()
                .duty_history
                .push(duty_cycle);
        });
        Ok(())
    }

    pub fn enable(&self) -> Result<(), Error> {
        self.set_enabled(true);
        Ok(())
    }

    pub fn disable(&self) -> Result<(), Error> {
        self.set_enabled(false);
        Ok(())
    }

    fn set_enabled(&self, enabled: bool) {
        MOCK_PWM.with(|pwm| {
            pwm.borrow_mut().entry(self.channel).or_default().enabled = enabled;
        });
    }
}

// Test helpers
pub fn duty_history(channel: Channel) -> Vec<f64> {
    MOCK_PWM.with(|pwm| {
        pwm.borrow()
            .get(&channel)
            .map(|c| c.duty_history.clone())
            .unwrap_or_default()
    })
}

pub fn is_enabled(channel: Channel) -> bool {
    MOCK_PWM.with(|pwm| pwm.borrow().get(&channel).is_some_and(|c| c.enabled))
}

pub fn frequency(channel: Channel) -> f64 {
    MOCK_PWM.with(|pwm| pwm.borrow().get(&channel).map_or(0.0, |c| c.frequency))
}

pub fn reset_mock_pwm() {
    MOCK_PWM.with(|pwm| pwm.borrow_mut().clear());
}
