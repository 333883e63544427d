//! Errors that can occur when decoding, compensating or talking to the BME280.
//!
//! The compensation and psychrometric code is bus independent, so its errors ([`FormatError`],
//! [`CompensationError`], [`LengthMismatch`] and [`LabelError`]) carry no type parameter.
//! [`Bme280Error`] wraps those together with the error type of the underlying bus (spi/i2c).

use core::fmt::{Display, Formatter};

/// A buffer handed to a decoder was shorter than the register block it describes.
///
/// Decoders check the length before touching any byte, so no partial result is ever produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormatError {
    /// Number of bytes the decoder needs.
    pub expected: usize,
    /// Number of bytes it was given.
    pub actual: usize,
}

impl FormatError {
    pub(crate) fn check(b: &[u8], expected: usize) -> Result<(), FormatError> {
        if b.len() < expected {
            return Err(FormatError { expected, actual: b.len() });
        }

        Ok(())
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "register buffer too short: expected {} bytes, got {}", self.expected, self.actual)
    }
}

impl core::error::Error for FormatError {}

/// Errors returned by the compensation engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompensationError {
    /// Pressure or humidity was requested before temperature was compensated for the current sample.
    ///
    /// This is a programming error in the caller. Compensate temperature first.
    Sequence,

    /// The pressure coefficients produce a zero divisor.
    ///
    /// Only happens with degenerate calibration data (e.g. an all-zero NVM).
    DivisionByZero,
}

impl Display for CompensationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CompensationError::Sequence => f.write_str("temperature must be compensated before pressure or humidity"),
            CompensationError::DivisionByZero => f.write_str("pressure coefficients yield a zero divisor"),
        }
    }
}

impl core::error::Error for CompensationError {}

/// The relative humidity and temperature slices passed to a vectorized conversion differ in length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LengthMismatch {
    pub relative_humidity: usize,
    pub temperature: usize,
}

impl Display for LengthMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} humidity values but {} temperature values",
            self.relative_humidity, self.temperature
        )
    }
}

impl core::error::Error for LengthMismatch {}

/// Errors from rebuilding calibration coefficients out of labeled values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LabelError {
    /// No value was supplied for this coefficient.
    Missing(&'static str),

    /// A `label=value` token whose value is not a number, or that has no `=`.
    InvalidValue,
}

impl Display for LabelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            LabelError::Missing(label) => write!(f, "missing calibration coefficient {}", label),
            LabelError::InvalidValue => f.write_str("malformed label=value token"),
        }
    }
}

impl core::error::Error for LabelError {}

/// This represents all possible errors that can occur when using the BME280 device.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bme280Error<BusError> {
    /// An error has occurred in the SPI / I2C driver
    Bus(BusError),

    /// Unable to communicate with BME280
    ///
    /// Could possibly indicate an error with pin configuration and/or wiring.
    NotConnected,

    /// The device did not finish copying its NVM or a measurement in a timely fashion.
    Timeout,

    /// Reading from a register returned fewer bytes than expected. This should not happen in normal circumstances.
    ///
    /// Could possibly indicate a bug in the bus implementation.
    UnexpectedRegisterData(FormatError),

    /// The raw sample could not be compensated.
    Compensation(CompensationError),
}

impl<BusError> From<FormatError> for Bme280Error<BusError> {
    fn from(e: FormatError) -> Self {
        Bme280Error::UnexpectedRegisterData(e)
    }
}

impl<BusError> From<CompensationError> for Bme280Error<BusError> {
    fn from(e: CompensationError) -> Self {
        Bme280Error::Compensation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_check() {
        assert_eq!(Ok(()), FormatError::check(&[0u8; 8], 8));
        assert_eq!(Ok(()), FormatError::check(&[0u8; 9], 8));
        assert_eq!(
            Err(FormatError { expected: 8, actual: 7 }),
            FormatError::check(&[0u8; 7], 8)
        );
    }

    #[test]
    fn compensation_error_messages() {
        let messages = [CompensationError::Sequence, CompensationError::DivisionByZero]
            .map(|e| e.to_string());

        assert_eq!(
            ["temperature must be compensated before pressure or humidity", "pressure coefficients yield a zero divisor"],
            messages
        );
    }
}
