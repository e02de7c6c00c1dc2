//! Register-map I2C bus for driver tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

#[derive(Debug, Default)]
pub struct MockBus {
    pub address: u8,
    pub registers: BTreeMap<u16, u8>,
    /// Every register write as (register, value)
    pub writes: Vec<(u16, u8)>,
    pub fail: bool,
    pointer: u16,
}

impl MockBus {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    pub fn set(&mut self, register: u16, bytes: &[u8]) {
        for (i, byte) in bytes.iter().enumerate() {
            self.registers.insert(register + i as u16, *byte);
        }
    }

    fn run(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if bytes.len() < 2 {
                        return Err(ErrorKind::Other);
                    }
                    self.pointer = u16::from_be_bytes([bytes[0], bytes[1]]);
                    for byte in &bytes[2..] {
                        self.registers.insert(self.pointer, *byte);
                        self.writes.push((self.pointer, *byte));
                        self.pointer += 1;
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers.get(&self.pointer).copied().unwrap_or(0);
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl embedded_hal::i2c::I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}
