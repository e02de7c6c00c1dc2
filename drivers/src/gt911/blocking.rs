use super::{
    check_product_id, decode_command, point_count, reg, Command, DeviceInfo, Geometry, Gt911Error, Rotation, Status,
    TouchPoint, TouchState, GT911_ADDRESS, MAX_TOUCH_POINTS, RAW_POINT_LEN,
};
use crate::BlockingRegisterDevice;
use embedded_hal::i2c::I2c;

#[derive(Debug)]
pub struct Gt911<I2C> {
    dev: BlockingRegisterDevice<I2C>,
    geometry: Geometry,
}

impl<I2C> Gt911<I2C>
where
    I2C: I2c,
{
    /// Create a new GT911 instance at the default address
    pub fn new(i2c: I2C, width: u16, height: u16) -> Self {
        Self::new_with_address(i2c, GT911_ADDRESS, width, height)
    }

    pub fn new_with_address(i2c: I2C, address: u8, width: u16, height: u16) -> Self {
        Self {
            dev: BlockingRegisterDevice::new(i2c, address),
            geometry: Geometry {
                width,
                height,
                rotation: Rotation::Normal,
            },
        }
    }

    /// Identify the controller and discard any stale sample
    pub fn begin(&mut self) -> Result<DeviceInfo, Gt911Error> {
        let product_id = self.get_product_id()?;
        check_product_id(product_id)?;

        let firmware_version = self.get_firmware_version()?;
        let (x_resolution, y_resolution) = self.get_resolution()?;
        let vendor_id = self.dev.read_register(reg::VENDOR_ID)?;

        // leave raw-data or screen-off mode from a previous run
        self.send_command(Command::ReadCoordinates)?;
        self.clear_status()?;

        Ok(DeviceInfo {
            product_id,
            firmware_version,
            x_resolution,
            y_resolution,
            vendor_id,
        })
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.geometry.rotation = rotation;
    }

    pub fn rotation(&self) -> Rotation {
        self.geometry.rotation
    }

    pub fn get_product_id(&mut self) -> Result<[u8; 4], Gt911Error> {
        let mut buffer = [0u8; 4];
        self.dev
            .read_register_buffer(reg::PRODUCT_ID, &mut buffer)?;
        Ok(buffer)
    }

    pub fn get_firmware_version(&mut self) -> Result<u16, Gt911Error> {
        let mut buffer = [0u8; 2];
        self.dev
            .read_register_buffer(reg::FIRMWARE_VERSION, &mut buffer)?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Resolution the controller firmware is configured for
    pub fn get_resolution(&mut self) -> Result<(u16, u16), Gt911Error> {
        let mut buffer = [0u8; 4];
        self.dev
            .read_register_buffer(reg::X_RESOLUTION, &mut buffer)?;
        Ok((
            u16::from_le_bytes([buffer[0], buffer[1]]),
            u16::from_le_bytes([buffer[2], buffer[3]]),
        ))
    }

    pub fn get_config_version(&mut self) -> Result<u8, Gt911Error> {
        let result = self.dev.read_register(reg::CONFIG_VERSION)?;
        Ok(result)
    }

    pub fn get_status(&mut self) -> Result<Status, Gt911Error> {
        let result = self.dev.read_register(reg::STATUS)?;
        Ok(Status::from_bits_truncate(result))
    }

    pub fn send_command(&mut self, command: Command) -> Result<(), Gt911Error> {
        self.dev.write_register(reg::COMMAND, command.into())?;
        Ok(())
    }

    pub fn get_command(&mut self) -> Result<Command, Gt911Error> {
        let raw = self.dev.read_register(reg::COMMAND)?;
        decode_command(raw)
    }

    /// Acknowledge the current sample so the controller can publish the next one
    pub fn clear_status(&mut self) -> Result<(), Gt911Error> {
        self.dev.write_register(reg::STATUS, 0)?;
        Ok(())
    }

    /// Read all points of a ready sample into `points`.
    ///
    /// Returns `None` if the controller has no new sample.
    pub fn read_points(
        &mut self,
        points: &mut [TouchPoint; MAX_TOUCH_POINTS],
    ) -> Result<Option<usize>, Gt911Error> {
        let raw_status = self.dev.read_register(reg::STATUS)?;
        let status = Status::from_bits_truncate(raw_status);
        if !status.contains(Status::BUFFER_READY) {
            return Ok(None);
        }

        let count = match point_count(status, raw_status) {
            Ok(count) => count,
            Err(e) => {
                self.clear_status()?;
                return Err(e);
            }
        };

        if count > 0 {
            let mut buffer = [0u8; RAW_POINT_LEN * MAX_TOUCH_POINTS];
            let buffer = &mut buffer[..RAW_POINT_LEN * count];
            self.dev.read_register_buffer(reg::POINT_1, buffer)?;
            for (point, raw) in points.iter_mut().zip(buffer.chunks_exact(RAW_POINT_LEN)) {
                *point = self.geometry.transform(TouchPoint::from_raw(raw));
            }
        }

        self.clear_status()?;
        Ok(Some(count))
    }

    /// Poll the controller for the primary touch point
    pub fn read_touch(&mut self) -> Result<TouchState, Gt911Error> {
        let mut points = [TouchPoint::default(); MAX_TOUCH_POINTS];
        let state = match self.read_points(&mut points)? {
            None => TouchState::NotReady,
            Some(0) => TouchState::Released,
            Some(_) => TouchState::Pressed(points[0]),
        };
        Ok(state)
    }

    pub fn release(self) -> I2C {
        self.dev.release()
    }
}
