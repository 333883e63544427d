//! Typed register catalog for the BME280.
//!
//! Every register (or fixed-size register block) is a marker type implementing [`Reg`] plus
//! [`Readable`] and/or [`Writable`]. The marker carries the address and transfer length, and
//! knows how to turn bytes into a typed value and back. See section 5.3 of the datasheet for the
//! memory map.
pub mod calibration;
pub mod chip_id;
pub mod config;
pub mod ctrl_hum;
pub mod ctrl_meas;
pub mod data;
pub mod reset;
pub mod status;

use crate::error::FormatError;

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Result<Self::Out, FormatError>;
}

pub trait Writable: Reg {
    type In;
    const N: usize = 1;
    fn encode(v: &Self::In, out: &mut [u8]);
}

/// Oversampling setting shared by the `osrs_t`, `osrs_p` (CTRL_MEAS) and `osrs_h` (CTRL_HUM) fields.
///
/// [`Oversampling::Skipped`] turns the channel off; its data registers then read back as `0x80000`
/// (temperature/pressure) or `0x8000` (humidity).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    /// Number of conversions averaged per measurement, 0 when skipped.
    pub fn factor(self) -> u32 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Oversampling::Skipped
    }
}

impl From<u8> for Oversampling {
    fn from(field: u8) -> Self {
        match field & 0b111 {
            0b000 => Oversampling::Skipped,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            // 0b101, 0b110 and 0b111 all mean x16
            _ => Oversampling::X16,
        }
    }
}

impl From<Oversampling> for u8 {
    fn from(v: Oversampling) -> u8 {
        match v {
            Oversampling::Skipped => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversampling_field() {
        assert_eq!(Oversampling::Skipped, Oversampling::from(0b000));
        assert_eq!(Oversampling::X4, Oversampling::from(0b011));
        assert_eq!(Oversampling::X16, Oversampling::from(0b101));
        assert_eq!(Oversampling::X16, Oversampling::from(0b111));

        let raw: u8 = Oversampling::X8.into();
        assert_eq!(0b100, raw);
        assert_eq!(0, Oversampling::Skipped.factor());
        assert!(!Oversampling::Skipped.is_enabled());
    }

    #[cfg(feature = "defmt")]
    #[test]
    fn register_payloads_are_loggable() {
        fn assert_format<T: defmt::Format>() {}

        assert_format::<config::ConfigFields>();
        assert_format::<ctrl_hum::CtrlHumFields>();
        assert_format::<ctrl_meas::CtrlMeasFields>();
        assert_format::<reset::ResetCommand>();
        assert_format::<status::StatusFlags>();
        assert_format::<data::RawMeasurement>();
    }
}
