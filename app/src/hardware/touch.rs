//! Touchpad hardware initialization module
//!
//! The GT911 sits alone on I2C1; its INT and RESET lines are not routed on
//! the CrowPanel, so the controller keeps its power-on address and is polled.

use drivers::gt911::asynch::Gt911Async;
use drivers::gt911::Gt911Error;
use esp_hal::i2c::master::{Config as I2cConfig, ConfigError, I2c};
use esp_hal::peripherals::{GPIO19, GPIO20, I2C1};
use esp_hal::time::Rate;
use esp_hal::Async;
use launcher::{DisplayConfig, TouchConfig};
use log::{info, warn};

/// Type alias for the GT911 touchpad driver instance
pub type Touchpad = Gt911Async<I2c<'static, Async>>;

#[derive(Debug)]
pub enum TouchError {
    Bus(ConfigError),
    Controller(Gt911Error),
}

impl From<ConfigError> for TouchError {
    fn from(e: ConfigError) -> Self {
        Self::Bus(e)
    }
}

impl From<Gt911Error> for TouchError {
    fn from(e: Gt911Error) -> Self {
        Self::Controller(e)
    }
}

/// Initializes the GT911 capacitive touchpad.
///
/// This function:
/// - Configures I2C1 on the board's SDA/SCL pins
/// - Identifies the controller and discards any stale sample
/// - Applies the configured rotation
///
/// # Errors
///
/// Returns an error if the bus cannot be configured or the controller does
/// not answer as a GT911.
pub async fn initialize_touchpad(
    i2c: I2C1<'static>,
    sda: GPIO19<'static>,
    scl: GPIO20<'static>,
    touch: &TouchConfig,
    display: &DisplayConfig,
) -> Result<Touchpad, TouchError> {
    let i2c = I2c::new(
        i2c,
        I2cConfig::default().with_frequency(Rate::from_khz(touch.frequency_khz)),
    )?
    .with_sda(sda)
    .with_scl(scl)
    .into_async();
    info!(
        "I2C1 SDA=GPIO{} SCL=GPIO{} at {}kHz",
        touch.sda_pin, touch.scl_pin, touch.frequency_khz
    );

    let mut touchpad =
        Gt911Async::new_with_address(i2c, touch.address, display.width, display.height);
    let device = touchpad.begin().await?;
    info!("Touch controller: {}", device);
    if (device.x_resolution, device.y_resolution) != (display.width, display.height) {
        warn!(
            "Touch controller configured for {}x{}, panel is {}x{}",
            device.x_resolution, device.y_resolution, display.width, display.height
        );
    }

    touchpad.set_rotation(touch.rotation);
    Ok(touchpad)
}
