#![no_std]
//! Touch controller drivers for the CrowPanel launcher firmware.
//!
//! The drivers talk to their devices through the `embedded-hal` I2C traits,
//! so they run unchanged on the ESP32-S3 and against the mock buses used in
//! the host tests.

/// GT911 capacitive touch controller driver.
pub mod gt911;

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
pub(crate) mod mock;

/// Register access for devices with 16-bit big-endian register addresses.
#[derive(Debug)]
pub(crate) struct BlockingRegisterDevice<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> BlockingRegisterDevice<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn read_register(&mut self, register: u16) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.read_register_buffer(register, &mut buffer)?;
        Ok(buffer[0])
    }

    pub fn read_register_buffer(
        &mut self,
        register: u16,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c
            .write_read(self.address, &register.to_be_bytes(), buffer)
    }

    pub fn write_register(&mut self, register: u16, value: u8) -> Result<(), I2C::Error> {
        let [high, low] = register.to_be_bytes();
        self.i2c.write(self.address, &[high, low, value])
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(feature = "async")]
#[derive(Debug)]
pub(crate) struct AsyncRegisterDevice<I2C> {
    i2c: I2C,
    address: u8,
}

#[cfg(feature = "async")]
impl<I2C> AsyncRegisterDevice<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub async fn read_register(&mut self, register: u16) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.read_register_buffer(register, &mut buffer).await?;
        Ok(buffer[0])
    }

    pub async fn read_register_buffer(
        &mut self,
        register: u16,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c
            .write_read(self.address, &register.to_be_bytes(), buffer)
            .await
    }

    pub async fn write_register(&mut self, register: u16, value: u8) -> Result<(), I2C::Error> {
        let [high, low] = register.to_be_bytes();
        self.i2c.write(self.address, &[high, low, value]).await
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}
