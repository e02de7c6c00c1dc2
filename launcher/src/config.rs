//! Board configuration
//!
//! Everything is fixed at compile time, the firmware reads no flags or
//! environment at run time.

use drivers::gt911::{Rotation, GT911_ADDRESS};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Horizontal resolution in pixels
    pub width: u16,
    /// Vertical resolution in pixels
    pub height: u16,
    /// Height of the partial draw buffer in lines
    pub draw_buffer_lines: u16,
}

impl DisplayConfig {
    /// Pixels in the partial draw buffer
    pub const fn draw_buffer_pixels(&self) -> usize {
        self.width as usize * self.draw_buffer_lines as usize
    }

    /// Pixels in a full frame
    pub const fn frame_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes in a full RGB565 frame
    pub const fn frame_bytes(&self) -> usize {
        self.frame_pixels() * 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchConfig {
    pub sda_pin: u8,
    pub scl_pin: u8,
    pub frequency_khz: u32,
    pub address: u8,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub theme: Theme,
}

impl BoardConfig {
    /// Elecrow CrowPanel 5.0" ESP32-S3 HMI, 800x480 RGB panel with GT911 touch
    pub const CROWPANEL_5: BoardConfig = BoardConfig {
        display: DisplayConfig {
            width: 800,
            height: 480,
            // ~80 lines worth of draw buffer, increase for a bit more perf
            draw_buffer_lines: 80,
        },
        touch: TouchConfig {
            sda_pin: 19,
            scl_pin: 20,
            frequency_khz: 400,
            address: GT911_ADDRESS,
            rotation: Rotation::Normal,
        },
        theme: Theme::DEFAULT,
    };
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::CROWPANEL_5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crowpanel_buffer_sizes() {
        let display = BoardConfig::CROWPANEL_5.display;
        assert_eq!(display.draw_buffer_pixels(), 64_000);
        assert_eq!(display.frame_pixels(), 384_000);
        assert_eq!(display.frame_bytes(), 768_000);
    }

    #[test]
    fn test_crowpanel_touch_wiring() {
        let touch = BoardConfig::default().touch;
        assert_eq!((touch.sda_pin, touch.scl_pin), (19, 20));
        assert_eq!(touch.frequency_khz, 400);
        assert_eq!(touch.address, 0x5D);
    }
}
