// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use rppal::spi::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    Spi0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaveSelect {
    Ss0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mode0,
}

#[derive(Default)]
struct Mcp3008State {
    channels: HashMap<u8, u16>,
    last_command: Vec<u8>,
    failing: bool,
}

thread_local! {
    static MOCK_ADC: RefCell<Mcp3008State> = RefCell::new(Mcp3008State::default());
}

/// Answers transfers the way an MCP3008 answers a single-ended read.
pub struct Spi;

impl Spi {
    pub fn new(_bus: Bus, _slave: SlaveSelect, _clock_hz: u32, _mode: Mode) -> Result<Self, Error> {
        Ok(Spi)
    }

    pub fn transfer(&self, read: &mut [u8], write: &[u8]) -> Result<usize, Error> {
        MOCK_ADC.with(|adc| {
            let mut adc = adc.borrow_mut();
            if adc.failing {
                return Err(Error::Io(io::Error::other("mock SPI failure")));
            }
            adc.last_command = write.to_vec();

            let channel = (write[1] >> 4) & 0x07;
            let value = adc.channels.get(&channel).copied().unwrap_or(0) & 0x3FF;
            read[0] = 0xFF;
            read[1] = 0xF8 | (value >> 8) as u8;
            read[2] = (value & 0xFF) as u8;
            Ok(write.len())
        })
    }
}

// test helper to set what a channel reads
pub fn set_mock_adc_value(channel: u8, value: u16) {
    MOCK_ADC.with(|adc| {
        adc.borrow_mut().channels.insert(channel, value);
    });
}

pub fn set_mock_spi_failing(failing: bool) {
    MOCK_ADC.with(|adc| adc.borrow_mut().failing = failing);
}

pub fn last_command() -> Vec<u8> {
    MOCK_ADC.with(|adc| adc.borrow().last_command.clone())
}

pub fn reset_mock_adc() {
    MOCK_ADC.with(|adc| *adc.borrow_mut() = Mcp3008State::default());
}
