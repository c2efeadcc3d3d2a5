use embedded_hal::i2c::I2c;

/// Byte and word register access on a bus device.
///
/// `register` is the complete command byte; framing is the driver's job. Any
/// [`embedded_hal::i2c::I2c`] bus implements this with SMBus semantics, so an owned bus,
/// a `&mut` borrow of one, or a shared-bus device handle can all be handed to the driver.
pub trait RegisterBus {
    type Error;

    fn read8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;

    fn write8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Reads an SMBus word, low byte first.
    fn read16(&mut self, address: u8, register: u8) -> Result<u16, Self::Error>;

    /// Writes an SMBus word, low byte first.
    fn write16(&mut self, address: u8, register: u8, value: u16) -> Result<(), Self::Error>;
}

impl<T> RegisterBus for T
where
    T: I2c,
{
    type Error = T::Error;

    fn read8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.write_read(address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.write(address, &[register, value])
    }

    fn read16(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.write_read(address, &[register], &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write16(&mut self, address: u8, register: u8, value: u16) -> Result<(), Self::Error> {
        let [lo, hi] = value.to_le_bytes();
        self.write(address, &[register, lo, hi])
    }
}
