use core::fmt::{self, Display, Formatter};

// https://github.com/goodix/gt9xx_driver_android (register map)
use bitflags::bitflags;
use embedded_hal::i2c::Error;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Default I2C address (INT low during reset)
pub const GT911_ADDRESS: u8 = 0x5D;
/// Alternate I2C address (INT high during reset)
pub const GT911_ADDRESS_ALT: u8 = 0x14;

/// Maximum number of simultaneous touch points reported by the GT911
pub const MAX_TOUCH_POINTS: usize = 5;

/// Number of bytes for a single touch point record
pub const RAW_POINT_LEN: usize = 8;

/// Product id reported by a genuine GT911
pub const PRODUCT_ID: [u8; 4] = *b"911\0";

pub(crate) mod reg {
    pub const COMMAND: u16 = 0x8040;
    pub const CONFIG_VERSION: u16 = 0x8047;
    pub const PRODUCT_ID: u16 = 0x8140;
    pub const FIRMWARE_VERSION: u16 = 0x8144;
    /// X then Y, u16 each
    pub const X_RESOLUTION: u16 = 0x8146;
    pub const VENDOR_ID: u16 = 0x814A;
    pub const STATUS: u16 = 0x814E;
    pub const POINT_1: u16 = 0x814F;
}

/// Values of the command register (0x8040)
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    ReadCoordinates = 0x00,
    ReadRawData = 0x01,
    SoftwareReset = 0x02,
    BaselineUpdate = 0x03,
    BaselineCalibration = 0x04,
    ScreenOff = 0x05,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Bit 7: coordinates are ready to be read
        const BUFFER_READY = 1 << 7;
        /// Bit 6: large area touch detected
        const LARGE_DETECT = 1 << 6;
        /// Bit 5: proximity valid
        const PROXIMITY = 1 << 5;
        /// Bit 4: a touch key is pressed
        const HAVE_KEY = 1 << 4;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        self.iter_names().for_each(|(name, _)| {
            defmt::write!(f, "{} ", name);
        });
    }
}

/// Orientation of the panel relative to the controller's native axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Normal,
    /// 90 degrees
    Left,
    /// 180 degrees
    Inverted,
    /// 270 degrees
    Right,
}

impl Rotation {
    /// Maps a raw controller coordinate into a `width` x `height` frame.
    ///
    /// The result is clamped to the frame, the controller occasionally
    /// reports the edge pixel one past the configured resolution.
    pub fn apply(self, x: u16, y: u16, width: u16, height: u16) -> (u16, u16) {
        let max_x = width.saturating_sub(1);
        let max_y = height.saturating_sub(1);
        let (x, y) = match self {
            Rotation::Normal => (x, y),
            Rotation::Left => (y, max_y.saturating_sub(x)),
            Rotation::Inverted => (max_x.saturating_sub(x), max_y.saturating_sub(y)),
            Rotation::Right => (max_x.saturating_sub(y), x),
        };
        (x.min(max_x), y.min(max_y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub track_id: u8,
    pub x: u16,
    pub y: u16,
    pub size: u16,
}

impl TouchPoint {
    pub(crate) fn from_raw(raw: &[u8]) -> Self {
        Self {
            track_id: raw[0],
            x: u16::from_le_bytes([raw[1], raw[2]]),
            y: u16::from_le_bytes([raw[3], raw[4]]),
            size: u16::from_le_bytes([raw[5], raw[6]]),
        }
    }
}

/// Result of polling the controller once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchState {
    /// No new sample since the last read, keep the previous state
    NotReady,
    /// Sample ready, nothing touching the panel
    Released,
    /// Sample ready, first point
    Pressed(TouchPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    pub product_id: [u8; 4],
    pub firmware_version: u16,
    pub x_resolution: u16,
    pub y_resolution: u16,
    pub vendor_id: u8,
}

impl DeviceInfo {
    pub fn product_name(&self) -> &str {
        let len = self
            .product_id
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.product_id.len());
        core::str::from_utf8(&self.product_id[..len]).unwrap_or("?")
    }
}

impl Display for DeviceInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GT{} fw 0x{:04X} {}x{} vendor 0x{:02X}",
            self.product_name(),
            self.firmware_version,
            self.x_resolution,
            self.y_resolution,
            self.vendor_id
        )
    }
}

/// Errors that can occur when interacting with the GT911
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gt911Error {
    I2CError,
    UnknownProduct([u8; 4]),
    InvalidPointCount(u8),
    UnknownCommand(u8),
}

impl Display for Gt911Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Gt911Error::I2CError => write!(f, "I2C bus error"),
            Gt911Error::UnknownProduct(id) => write!(f, "unknown product id {:02X?}", id),
            Gt911Error::InvalidPointCount(n) => write!(f, "invalid point count {}", n),
            Gt911Error::UnknownCommand(c) => write!(f, "unknown command 0x{:02X}", c),
        }
    }
}

impl<E> From<E> for Gt911Error
where
    E: Error,
{
    fn from(_: E) -> Self {
        Gt911Error::I2CError
    }
}

/// Output frame and orientation applied to every reported point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Geometry {
    pub width: u16,
    pub height: u16,
    pub rotation: Rotation,
}

impl Geometry {
    pub fn transform(&self, point: TouchPoint) -> TouchPoint {
        let (x, y) = self
            .rotation
            .apply(point.x, point.y, self.width, self.height);
        TouchPoint { x, y, ..point }
    }
}

pub(crate) fn point_count(status: Status, raw: u8) -> Result<usize, Gt911Error> {
    debug_assert!(status.contains(Status::BUFFER_READY));
    let count = raw & 0x0F;
    if count as usize > MAX_TOUCH_POINTS {
        return Err(Gt911Error::InvalidPointCount(count));
    }
    Ok(count as usize)
}

pub(crate) fn check_product_id(id: [u8; 4]) -> Result<(), Gt911Error> {
    // Some batches report "9110" instead of a NUL terminated "911"
    if id[..3] == PRODUCT_ID[..3] {
        Ok(())
    } else {
        Err(Gt911Error::UnknownProduct(id))
    }
}

pub(crate) fn decode_command(raw: u8) -> Result<Command, Gt911Error> {
    Command::try_from(raw).map_err(|e| Gt911Error::UnknownCommand(e.number))
}

#[cfg(feature = "async")]
pub mod asynch;
pub mod blocking;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_rotation_normal_is_identity() {
        assert_eq!(Rotation::Normal.apply(10, 20, 800, 480), (10, 20));
    }

    #[test]
    fn test_rotation_inverted() {
        assert_eq!(Rotation::Inverted.apply(0, 0, 800, 480), (799, 479));
        assert_eq!(Rotation::Inverted.apply(799, 479, 800, 480), (0, 0));
    }

    #[test]
    fn test_rotation_quarter_turns() {
        // native frame is 480 wide, 800 high
        assert_eq!(Rotation::Left.apply(0, 0, 800, 480), (0, 479));
        assert_eq!(Rotation::Left.apply(479, 799, 800, 480), (799, 0));
        assert_eq!(Rotation::Right.apply(0, 0, 800, 480), (799, 0));
        assert_eq!(Rotation::Right.apply(479, 799, 800, 480), (0, 479));
    }

    #[test]
    fn test_rotation_clamps_to_frame() {
        assert_eq!(Rotation::Normal.apply(800, 480, 800, 480), (799, 479));
        assert_eq!(Rotation::Normal.apply(u16::MAX, 0, 800, 480), (799, 0));
    }

    #[test]
    fn test_point_from_raw() {
        let raw = [3, 0x20, 0x03, 0xE0, 0x01, 0x18, 0x00, 0x00];
        let point = TouchPoint::from_raw(&raw);
        assert_eq!(
            point,
            TouchPoint {
                track_id: 3,
                x: 800,
                y: 480,
                size: 24
            }
        );
    }

    #[test]
    fn test_point_count_rejects_more_than_five() {
        let status = Status::from_bits_truncate(0x86);
        assert_eq!(
            point_count(status, 0x86),
            Err(Gt911Error::InvalidPointCount(6))
        );
        assert_eq!(point_count(Status::BUFFER_READY, 0x82), Ok(2));
    }

    #[test]
    fn test_product_id_check() {
        assert!(check_product_id(*b"911\0").is_ok());
        assert!(check_product_id(*b"9110").is_ok());
        assert_eq!(
            check_product_id(*b"928\0"),
            Err(Gt911Error::UnknownProduct(*b"928\0"))
        );
    }

    #[test]
    fn test_decode_command() {
        assert_eq!(decode_command(0x05), Ok(Command::ScreenOff));
        assert_eq!(u8::from(Command::SoftwareReset), 0x02);
        assert_eq!(decode_command(0x42), Err(Gt911Error::UnknownCommand(0x42)));
    }

    #[test]
    fn test_device_info_display() {
        let info = DeviceInfo {
            product_id: *b"911\0",
            firmware_version: 0x1060,
            x_resolution: 800,
            y_resolution: 480,
            vendor_id: 0x02,
        };
        assert_eq!(info.product_name(), "911");
        assert_eq!(format!("{}", info), "GT911 fw 0x1060 800x480 vendor 0x02");
    }
}
