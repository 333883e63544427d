//! ### CONFIG - Standby time, IIR filter and SPI 3-wire (`0xF5`, 1 byte, R/W)
//!
//! Bit layout: `t_sb[7:5] filter[4:2] - spi3w_en[0]`.
//!
//! Writes to this register may be ignored in normal mode; the driver writes it while the device
//! sleeps.
//!
//! ### Examples
//! ```rust,no_run
//! # use bme280_rs::{Bme280, Bme280Result};
//! # use bme280_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Bme280<B>)
//! #     -> Bme280Result<(), B::Error> {
//! use bme280_rs::register::config::{Config, ConfigFields, FilterCoefficient, StandbyTime};
//!
//! let data = device.read::<Config>().await?;
//! println!("{:?}", data.filter);
//!
//! device.write::<Config>(&ConfigFields {
//!     standby: StandbyTime::Ms1000,
//!     filter: FilterCoefficient::Coef4,
//!     spi3w_en: false,
//! }).await?;
//! # Ok(()) }
//! ```
use crate::error::FormatError;
use crate::register::{Readable, Reg, Writable};

/// Marker type for CONFIG (0xF5) register
pub struct Config;
impl Reg for Config { const ADDR: u8 = 0xF5; }

/// The payload for the CONFIG (0xF5) register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigFields {
    /// Inactive duration between two measurements in normal mode.
    pub standby: StandbyTime,
    /// The IIR filter coefficient. Read more about the filter in the datasheet section 3.4.4
    pub filter: FilterCoefficient,
    /// Enables the 3-wire SPI interface.
    pub spi3w_en: bool,
}

impl Readable for Config {
    type Out = ConfigFields;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, <Self as Readable>::N)?;
        Ok(ConfigFields {
            standby: StandbyTime::from((b[0] >> 5) & 0b111),
            filter: FilterCoefficient::from((b[0] >> 2) & 0b111),
            spi3w_en: b[0] & 0b1 != 0,
        })
    }
}

impl Writable for Config {
    type In = ConfigFields;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let standby: u8 = v.standby.into();
        let filter: u8 = v.filter.into();
        out[0] = (standby << 5) | (filter << 2) | v.spi3w_en as u8;
    }
}

/// IIR filter coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterCoefficient {
    /// Filter off
    Off,
    Coef2,
    Coef4,
    Coef8,
    Coef16,
}

impl From<FilterCoefficient> for u8 {
    fn from(v: FilterCoefficient) -> u8 {
        match v {
            FilterCoefficient::Off => 0b000,
            FilterCoefficient::Coef2 => 0b001,
            FilterCoefficient::Coef4 => 0b010,
            FilterCoefficient::Coef8 => 0b011,
            FilterCoefficient::Coef16 => 0b100,
        }
    }
}

impl From<u8> for FilterCoefficient {
    fn from(field: u8) -> Self {
        match field {
            0b000 => FilterCoefficient::Off,
            0b001 => FilterCoefficient::Coef2,
            0b010 => FilterCoefficient::Coef4,
            0b011 => FilterCoefficient::Coef8,
            _ => FilterCoefficient::Coef16,
        }
    }
}

/// Standby time between measurements in normal mode (`t_sb`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyTime {
    Ms0p5,
    Ms62p5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

impl StandbyTime {
    pub fn as_micros(self) -> u32 {
        match self {
            StandbyTime::Ms0p5 => 500,
            StandbyTime::Ms62p5 => 62_500,
            StandbyTime::Ms125 => 125_000,
            StandbyTime::Ms250 => 250_000,
            StandbyTime::Ms500 => 500_000,
            StandbyTime::Ms1000 => 1_000_000,
            StandbyTime::Ms10 => 10_000,
            StandbyTime::Ms20 => 20_000,
        }
    }
}

impl From<StandbyTime> for u8 {
    fn from(v: StandbyTime) -> u8 {
        match v {
            StandbyTime::Ms0p5 => 0b000,
            StandbyTime::Ms62p5 => 0b001,
            StandbyTime::Ms125 => 0b010,
            StandbyTime::Ms250 => 0b011,
            StandbyTime::Ms500 => 0b100,
            StandbyTime::Ms1000 => 0b101,
            StandbyTime::Ms10 => 0b110,
            StandbyTime::Ms20 => 0b111,
        }
    }
}

impl From<u8> for StandbyTime {
    fn from(field: u8) -> Self {
        match field & 0b111 {
            0b000 => StandbyTime::Ms0p5,
            0b001 => StandbyTime::Ms62p5,
            0b010 => StandbyTime::Ms125,
            0b011 => StandbyTime::Ms250,
            0b100 => StandbyTime::Ms500,
            0b101 => StandbyTime::Ms1000,
            0b110 => StandbyTime::Ms10,
            _ => StandbyTime::Ms20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_decode() {
        let reg = Config::decode(&[0b0000_0000]).unwrap();
        assert_eq!(StandbyTime::Ms0p5, reg.standby);
        assert_eq!(FilterCoefficient::Off, reg.filter);
        assert!(!reg.spi3w_en);

        let reg = Config::decode(&[0b1011_0001]).unwrap();
        assert_eq!(StandbyTime::Ms1000, reg.standby);
        assert_eq!(FilterCoefficient::Coef16, reg.filter);
        assert!(reg.spi3w_en);

        // Reserved filter values behave like x16
        let reg = Config::decode(&[0b0001_1100]).unwrap();
        assert_eq!(FilterCoefficient::Coef16, reg.filter);
    }

    #[test]
    fn config_encode() {
        let mut buffer = [0u8; 1];
        Config::encode(&ConfigFields {
            standby: StandbyTime::Ms0p5,
            filter: FilterCoefficient::Off,
            spi3w_en: false,
        }, &mut buffer);
        assert_eq!([0b0000_0000], buffer);

        Config::encode(&ConfigFields {
            standby: StandbyTime::Ms20,
            filter: FilterCoefficient::Coef2,
            spi3w_en: true,
        }, &mut buffer);
        assert_eq!([0b1110_0101], buffer);
    }

    #[test]
    fn config_decode_short_buffer() {
        assert_eq!(
            Err(FormatError { expected: 1, actual: 0 }),
            Config::decode(&[]).map(|_| ())
        );
    }
}
