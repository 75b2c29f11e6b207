pub mod mock_pwm;
pub mod mock_rig;
pub mod mock_spi;
