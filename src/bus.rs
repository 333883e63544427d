//! The raw-byte source the driver reads registers from.
//!
//! [`Bus`] is implemented for I2C ([`I2c`]) and 4-wire SPI ([`Spi`]) on top of
//! `embedded-hal-async`. Implement it yourself to feed the driver from anything else, e.g. a
//! recorded register dump.
use crate::error::Bme280Error;
use crate::register::{Readable, Writable};
use crate::Bme280Result;

/// Largest register block transferred in one go (the temperature/pressure calibration area).
pub const MAX_REG_BYTES: usize = 24;

pub trait Bus {
    type Error;

    fn read<R: Readable>(&mut self) -> impl Future<Output = Bme280Result<R::Out, Self::Error>>;

    fn write<W: Writable>(&mut self, v: &W::In) -> impl Future<Output = Bme280Result<(), Self::Error>>;
}

pub struct I2c<I2cType> {
    i2c: I2cType,
    address: u8,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: I2cType, address: u8) -> Self {
        Self { i2c, address }
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    type Error = <I2cType as embedded_hal_async::i2c::ErrorType>::Error;

    async fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, Self::Error> {
        let mut buf = [0u8; MAX_REG_BYTES];
        self.i2c
            .write_read(self.address, &[R::ADDR], &mut buf[..R::N])
            .await
            .map_err(Bme280Error::Bus)?;

        Ok(R::decode(&buf[..R::N])?)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), Self::Error> {
        let mut buf = [0u8; MAX_REG_BYTES + 1];
        buf[0] = W::ADDR;
        W::encode(v, &mut buf[1..=W::N]);
        self.i2c
            .write(self.address, &buf[..=W::N])
            .await
            .map_err(Bme280Error::Bus)
    }
}

pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    pub(crate) fn new(spi: SpiType) -> Self {
        Self { spi }
    }
}

// In SPI mode only 7 bits of the register address are used; bit 7 selects read (1) or write (0).
const SPI_READ: u8 = 0x80;

impl<SpiType> Bus for Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    type Error = <SpiType as embedded_hal_async::spi::ErrorType>::Error;

    async fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, Self::Error> {
        use embedded_hal_async::spi::Operation;

        let mut buf = [0u8; MAX_REG_BYTES];
        self.spi
            .transaction(&mut [
                Operation::Write(&[R::ADDR | SPI_READ]),
                Operation::Read(&mut buf[..R::N]),
            ])
            .await
            .map_err(Bme280Error::Bus)?;

        Ok(R::decode(&buf[..R::N])?)
    }

    async fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), Self::Error> {
        let mut buf = [0u8; MAX_REG_BYTES + 1];
        buf[0] = W::ADDR & !SPI_READ;
        W::encode(v, &mut buf[1..=W::N]);
        self.spi
            .write(&buf[..=W::N])
            .await
            .map_err(Bme280Error::Bus)
    }
}
