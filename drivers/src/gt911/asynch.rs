use super::{
    check_product_id, decode_command, point_count, reg, Command, DeviceInfo, Geometry, Gt911Error, Rotation, Status,
    TouchPoint, TouchState, GT911_ADDRESS, MAX_TOUCH_POINTS, RAW_POINT_LEN,
};
use crate::AsyncRegisterDevice;

#[derive(Debug)]
pub struct Gt911Async<I2C> {
    dev: AsyncRegisterDevice<I2C>,
    geometry: Geometry,
}

impl<I2C> Gt911Async<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Create a new GT911 instance at the default address
    pub fn new(i2c: I2C, width: u16, height: u16) -> Self {
        Self::new_with_address(i2c, GT911_ADDRESS, width, height)
    }

    pub fn new_with_address(i2c: I2C, address: u8, width: u16, height: u16) -> Self {
        Self {
            dev: AsyncRegisterDevice::new(i2c, address),
            geometry: Geometry {
                width,
                height,
                rotation: Rotation::Normal,
            },
        }
    }

    pub async fn begin(&mut self) -> Result<DeviceInfo, Gt911Error> {
        let product_id = self.get_product_id().await?;
        check_product_id(product_id)?;

        let firmware_version = self.get_firmware_version().await?;
        let (x_resolution, y_resolution) = self.get_resolution().await?;
        let vendor_id = self.dev.read_register(reg::VENDOR_ID).await?;

        // leave raw-data or screen-off mode from a previous run
        self.send_command(Command::ReadCoordinates).await?;
        self.clear_status().await?;

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

    pub async fn get_product_id(&mut self) -> Result<[u8; 4], Gt911Error> {
        let mut buffer = [0u8; 4];
        self.dev
            .read_register_buffer(reg::PRODUCT_ID, &mut buffer)
            .await?;
        Ok(buffer)
    }

    pub async fn get_firmware_version(&mut self) -> Result<u16, Gt911Error> {
        let mut buffer = [0u8; 2];
        self.dev
            .read_register_buffer(reg::FIRMWARE_VERSION, &mut buffer)
            .await?;
        Ok(u16::from_le_bytes(buffer))
    }

    pub async fn get_resolution(&mut self) -> Result<(u16, u16), Gt911Error> {
        let mut buffer = [0u8; 4];
        self.dev
            .read_register_buffer(reg::X_RESOLUTION, &mut buffer)
            .await?;
        Ok((
            u16::from_le_bytes([buffer[0], buffer[1]]),
            u16::from_le_bytes([buffer[2], buffer[3]]),
        ))
    }

    pub async fn get_config_version(&mut self) -> Result<u8, Gt911Error> {
        let result = self.dev.read_register(reg::CONFIG_VERSION).await?;
        Ok(result)
    }

    pub async fn get_status(&mut self) -> Result<Status, Gt911Error> {
        let result = self.dev.read_register(reg::STATUS).await?;
        Ok(Status::from_bits_truncate(result))
    }

    pub async fn send_command(&mut self, command: Command) -> Result<(), Gt911Error> {
        self.dev.write_register(reg::COMMAND, command.into()).await?;
        Ok(())
    }

    pub async fn get_command(&mut self) -> Result<Command, Gt911Error> {
        let raw = self.dev.read_register(reg::COMMAND).await?;
        decode_command(raw)
    }

    pub async fn clear_status(&mut self) -> Result<(), Gt911Error> {
        self.dev.write_register(reg::STATUS, 0).await?;
        Ok(())
    }

    pub async fn read_points(
        &mut self,
        points: &mut [TouchPoint; MAX_TOUCH_POINTS],
    ) -> Result<Option<usize>, Gt911Error> {
        let raw_status = self.dev.read_register(reg::STATUS).await?;
        let status = Status::from_bits_truncate(raw_status);
        if !status.contains(Status::BUFFER_READY) {
            return Ok(None);
        }

        let count = match point_count(status, raw_status) {
            Ok(count) => count,
            Err(e) => {
                self.clear_status().await?;
                return Err(e);
            }
        };

        if count > 0 {
            let mut buffer = [0u8; RAW_POINT_LEN * MAX_TOUCH_POINTS];
            let buffer = &mut buffer[..RAW_POINT_LEN * count];
            self.dev.read_register_buffer(reg::POINT_1, buffer).await?;
            for (point, raw) in points.iter_mut().zip(buffer.chunks_exact(RAW_POINT_LEN)) {
                *point = self.geometry.transform(TouchPoint::from_raw(raw));
            }
        }

        self.clear_status().await?;
        Ok(Some(count))
    }

    pub async fn read_touch(&mut self) -> Result<TouchState, Gt911Error> {
        let mut points = [TouchPoint::default(); MAX_TOUCH_POINTS];
        let state = match self.read_points(&mut points).await? {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBus;
    use embassy_futures::block_on;

    fn bus() -> MockBus {
        let mut bus = MockBus::new(GT911_ADDRESS);
        bus.set(reg::PRODUCT_ID, b"911\0");
        bus.set(reg::FIRMWARE_VERSION, &[0x60, 0x10]);
        bus.set(reg::X_RESOLUTION, &[0x20, 0x03, 0xE0, 0x01]);
        bus
    }

    #[test]
    fn test_begin_and_poll() {
        let mut bus = bus();
        bus.set(reg::STATUS, &[0x81]);
        bus.set(reg::POINT_1, &[0, 0x90, 0x01, 0xF0, 0x00, 9, 0, 0]);
        let mut touch = Gt911Async::new(&mut bus, 800, 480);

        let info = block_on(touch.begin()).unwrap();
        assert_eq!((info.x_resolution, info.y_resolution), (800, 480));
        // begin() acknowledged the pending sample
        assert_eq!(block_on(touch.read_touch()), Ok(TouchState::NotReady));

        block_on(touch.dev.write_register(reg::STATUS, 0x81)).unwrap();
        assert_eq!(
            block_on(touch.read_touch()),
            Ok(TouchState::Pressed(TouchPoint {
                track_id: 0,
                x: 400,
                y: 240,
                size: 9
            }))
        );
        assert_eq!(block_on(touch.get_status()), Ok(Status::empty()));
    }

    #[test]
    fn test_rotation_right() {
        let mut bus = bus();
        bus.set(reg::STATUS, &[0x81]);
        bus.set(reg::POINT_1, &[0, 0, 0, 0, 0, 0, 0, 0]);
        let mut touch = Gt911Async::new(&mut bus, 800, 480);
        touch.set_rotation(Rotation::Right);
        assert_eq!(touch.rotation(), Rotation::Right);
        match block_on(touch.read_touch()) {
            Ok(TouchState::Pressed(point)) => assert_eq!((point.x, point.y), (799, 0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_screen_off_command() {
        let mut bus = bus();
        let mut touch = Gt911Async::new(&mut bus, 800, 480);
        block_on(touch.send_command(Command::ScreenOff)).unwrap();
        assert_eq!(block_on(touch.get_command()), Ok(Command::ScreenOff));
    }

    #[test]
    fn test_bus_failure() {
        let mut bus = bus();
        bus.fail = true;
        let mut touch = Gt911Async::new(&mut bus, 800, 480);
        assert_eq!(block_on(touch.read_touch()), Err(Gt911Error::I2CError));
    }
}
