//! Hardware initialization modules
//!
//! This module provides the initialization functions for the peripherals of
//! the CrowPanel 5.0" ESP32-S3 HMI:
//!
//! - **Display**: 800x480 RGB565 panel on the LCD_CAM peripheral (DPI) with a PSRAM frame
//! - **Touchpad**: GT911 capacitive touch controller via I2C

pub mod display;
pub mod touch;

// Re-export commonly used types and functions for convenience
pub use display::{initialize_display, DisplayError, DisplayPeripherals, RgbPanel};
pub use touch::{initialize_touchpad, Touchpad};
