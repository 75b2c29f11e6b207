use tracing::{error, info};

// Use rppal in production
#[cfg(not(test))]
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_spi::{Bus, Mode, SlaveSelect, Spi};

use crate::actuator::PanelSensor;
use crate::config::AdcConfig;
use crate::error::{Result, TrackerError};

/// MCP3008 resolution is 10 bits.
pub const ADC_MAX: i32 = 1023;
const MCP3008_CHANNELS: u8 = 8;

/// Start bit, then single-ended mode plus channel in the high nibble.
fn read_command(channel: u8) -> [u8; 3] {
    [0x01, (0x08 | channel) << 4, 0x00]
}

/// The 10-bit result is the low two bits of the second byte and the third byte.
fn decode(response: &[u8; 3]) -> i32 {
    (((response[1] as i32) << 8) | response[2] as i32) & ADC_MAX
}

/// One single-ended MCP3008 channel on SPI0 / CE0.
pub struct AdcChannel {
    spi: Spi,
    channel: u8,
}

impl AdcChannel {
    pub fn open(channel: u8, config: &AdcConfig) -> Result<Self> {
        if channel >= MCP3008_CHANNELS {
            return Err(TrackerError::InvalidAdcChannel(channel));
        }
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, config.spi_clock_hz, Mode::Mode0)?;
        info!(channel, "MCP3008 channel ready");
        Ok(Self { spi, channel })
    }

    /// Read the channel, 0..=1023.
    pub fn read(&mut self) -> Result<i32> {
        let mut response = [0u8; 3];
        self.spi.transfer(&mut response, &read_command(self.channel))?;
        Ok(decode(&response))
    }
}

impl PanelSensor for AdcChannel {
    /// A failed transfer reads as 0 so the search keeps its step count.
    fn sample(&mut self) -> i32 {
        match self.read() {
            Ok(value) => value,
            Err(e) => {
                error!(channel = self.channel, "ADC read failed: {}", e);
                0
            }
        }
    }
}
