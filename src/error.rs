use thiserror::Error;

/// Errors raised while bringing up or configuring the tracker.
///
/// The search loop itself has no failure path; these only come from
/// configuration, the data log and driver construction.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    #[error("SPI error: {0}")]
    Spi(#[from] rppal::spi::Error),

    #[error("invalid PWM pin {0}, use 12, 13, 18 or 19")]
    InvalidPwmPin(u8),

    #[error("invalid ADC channel {0}, MCP3008 has channels 0-7")]
    InvalidAdcChannel(u8),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
