use crate::error::FormatError;
use crate::register::{Readable, Reg};

/// Marker struct for the PRESS/TEMP/HUM data registers (0xF7 - 0xFE).
/// The BME280 will auto-increment on multiple reads, so reading 8 bytes from 0xF7 reads pressure,
/// temperature and humidity in one burst read. The datasheet (section 4) requires a burst read
/// so that all three values belong to the same measurement.
/// Note that this will return the raw uncompensated data. For most use cases
/// calling [`Bme280::read_measurement()`](crate::Bme280::read_measurement) is recommended as it will
/// compensate the data for you.
///
/// - **Length:** 8 bytes
/// - **Access:** Read-only
pub struct Data;
impl Reg for Data { const ADDR: u8 = 0xF7; }

/// Temperature and pressure registers read this value when their oversampling is skipped.
pub const SKIPPED_20BIT: u32 = 0x80000;

/// Humidity registers read this value when humidity oversampling is skipped.
pub const SKIPPED_16BIT: u16 = 0x8000;

/// One burst of uncompensated ADC values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeasurement {
    temperature: u32,
    pressure: u32,
    humidity: u16,
}

impl RawMeasurement {
    pub fn new(temperature: u32, pressure: u32, humidity: u16) -> Self {
        Self { temperature, pressure, humidity }
    }

    /// Reconstructs the 20-bit pressure, 20-bit temperature and 16-bit humidity values from an
    /// 8-byte burst read starting at PRESS_MSB.
    pub fn decode(b: &[u8]) -> Result<Self, FormatError> {
        FormatError::check(b, Data::N)?;

        Ok(Self {
            pressure: (b[2] as u32 >> 4) | ((b[1] as u32) << 4) | ((b[0] as u32) << 12),
            temperature: (b[5] as u32 >> 4) | ((b[4] as u32) << 4) | ((b[3] as u32) << 12),
            humidity: b[7] as u16 | ((b[6] as u16) << 8),
        })
    }

    /// Lays the values out the way the device presents them. The unused low nibbles of the
    /// XLSB registers are zero.
    pub fn encode(&self) -> [u8; 8] {
        let p = self.pressure & 0xF_FFFF;
        let t = self.temperature & 0xF_FFFF;
        [
            (p >> 12) as u8,
            (p >> 4) as u8,
            ((p & 0xF) << 4) as u8,
            (t >> 12) as u8,
            (t >> 4) as u8,
            ((t & 0xF) << 4) as u8,
            (self.humidity >> 8) as u8,
            self.humidity as u8,
        ]
    }

    /// Returns the raw temperature from the TEMP_MSB, TEMP_LSB and TEMP_XLSB registers
    pub fn temperature(&self) -> u32 { self.temperature }

    /// Returns the raw pressure from the PRESS_MSB, PRESS_LSB and PRESS_XLSB registers
    pub fn pressure(&self) -> u32 { self.pressure }

    /// Returns the raw humidity from the HUM_MSB and HUM_LSB registers
    pub fn humidity(&self) -> u16 { self.humidity }

    pub fn temperature_skipped(&self) -> bool { self.temperature == SKIPPED_20BIT }

    pub fn pressure_skipped(&self) -> bool { self.pressure == SKIPPED_20BIT }

    pub fn humidity_skipped(&self) -> bool { self.humidity == SKIPPED_16BIT }
}

impl Readable for Data {
    type Out = RawMeasurement;

    const N: usize = 8;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        RawMeasurement::decode(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_decode() {
        let reg = Data::decode(&[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x23, 0x28]).unwrap();

        assert_eq!(415148, reg.pressure);
        assert_eq!(519888, reg.temperature);
        assert_eq!(9000, reg.humidity);
    }

    #[test]
    fn data_decode_ignores_low_xlsb_nibble() {
        let a = Data::decode(&[0xAA, 0xBB, 0xC0, 0xDD, 0xEE, 0xF0, 0x12, 0x34]).unwrap();
        let b = Data::decode(&[0xAA, 0xBB, 0xCF, 0xDD, 0xEE, 0xFF, 0x12, 0x34]).unwrap();

        assert_eq!(a, b);
        assert_eq!(0xAABBC, a.pressure);
        assert_eq!(0xDDEEF, a.temperature);
        assert_eq!(0x1234, a.humidity);
    }

    #[test]
    fn data_decode_short_buffer() {
        assert_eq!(
            Err(FormatError { expected: 8, actual: 6 }),
            RawMeasurement::decode(&[0u8; 6])
        );
    }

    #[test]
    fn data_encode() {
        let raw = RawMeasurement::new(519888, 415148, 9000);
        assert_eq!([0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x23, 0x28], raw.encode());
    }

    #[test]
    fn skipped_channels() {
        let raw = Data::decode(&[0x80, 0x00, 0x00, 0x80, 0x00, 0x00, 0x80, 0x00]).unwrap();
        assert!(raw.pressure_skipped());
        assert!(raw.temperature_skipped());
        assert!(raw.humidity_skipped());

        let raw = RawMeasurement::new(519888, 415148, 9000);
        assert!(!raw.pressure_skipped());
        assert!(!raw.temperature_skipped());
        assert!(!raw.humidity_skipped());
    }
}
