//! ### CTRL_MEAS - Temperature/pressure oversampling and power mode (`0xF4`, 1 byte, R/W)
//!
//! Bit layout: `osrs_t[7:5] osrs_p[4:2] mode[1:0]`.
//!
//! ### Examples
//! ```rust,no_run
//! # use bme280_rs::{Bme280, Bme280Result};
//! # use bme280_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Bme280<B>)
//! #     -> Bme280Result<(), B::Error> {
//! use bme280_rs::register::ctrl_meas::{CtrlMeas, CtrlMeasFields, PowerMode};
//! use bme280_rs::register::Oversampling;
//!
//! device.write::<CtrlMeas>(&CtrlMeasFields {
//!     osrs_t: Oversampling::X2,
//!     osrs_p: Oversampling::X16,
//!     mode: PowerMode::Normal,
//! }).await?;
//! # Ok(()) }
//! ```
#![doc(alias = "CTRL_MEAS")]
use crate::error::FormatError;
use crate::register::{Oversampling, Readable, Reg, Writable};

/// Marker type for CTRL_MEAS (0xF4) register
pub struct CtrlMeas;
impl Reg for CtrlMeas { const ADDR: u8 = 0xF4; }

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlMeasFields {
    pub osrs_t: Oversampling,
    pub osrs_p: Oversampling,
    pub mode: PowerMode,
}

impl Readable for CtrlMeas {
    type Out = CtrlMeasFields;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, <Self as Readable>::N)?;
        let v = b[0];
        Ok(CtrlMeasFields {
            osrs_t: Oversampling::from((v >> 5) & 0b111),
            osrs_p: Oversampling::from((v >> 2) & 0b111),
            mode: PowerMode::from(v & 0b11),
        })
    }
}

impl Writable for CtrlMeas {
    type In = CtrlMeasFields;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let osrs_t: u8 = v.osrs_t.into();
        let osrs_p: u8 = v.osrs_p.into();
        let mode: u8 = v.mode.into();
        out[0] = (osrs_t << 5) | (osrs_p << 2) | mode;
    }
}

/// Describes the different power modes that can be set in the CTRL_MEAS register.
///
/// For more information, see section 3.3 in the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Sleep mode. This is the default mode after power on reset.
    Sleep,
    /// Forced mode. A single measurement is performed after which the device returns to Sleep mode.
    Forced,
    /// Normal mode. Measurements are constantly performed, separated by the configured standby time.
    Normal,
}

impl From<u8> for PowerMode {
    fn from(field: u8) -> Self {
        match field {
            0b00 => PowerMode::Sleep,
            0b01 | 0b10 => PowerMode::Forced,
            _ => PowerMode::Normal,
        }
    }
}

impl From<PowerMode> for u8 {
    fn from(v: PowerMode) -> u8 {
        match v {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
            PowerMode::Normal => 0b11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_meas_decode() {
        let reg = CtrlMeas::decode(&[0b0000_0000]).unwrap();
        assert_eq!(Oversampling::Skipped, reg.osrs_t);
        assert_eq!(Oversampling::Skipped, reg.osrs_p);
        assert_eq!(PowerMode::Sleep, reg.mode);

        let reg = CtrlMeas::decode(&[0b0010_0101]).unwrap();
        assert_eq!(Oversampling::X1, reg.osrs_t);
        assert_eq!(Oversampling::X1, reg.osrs_p);
        assert_eq!(PowerMode::Forced, reg.mode);

        let reg = CtrlMeas::decode(&[0b0101_0110]).unwrap();
        assert_eq!(Oversampling::X2, reg.osrs_t);
        assert_eq!(Oversampling::X16, reg.osrs_p);
        assert_eq!(PowerMode::Forced, reg.mode);

        let reg = CtrlMeas::decode(&[0b0000_0011]).unwrap();
        assert_eq!(PowerMode::Normal, reg.mode);
    }

    #[test]
    fn ctrl_meas_encode() {
        let mut buffer = [0u8; 1];
        CtrlMeas::encode(&CtrlMeasFields {
            osrs_t: Oversampling::X1,
            osrs_p: Oversampling::X1,
            mode: PowerMode::Forced,
        }, &mut buffer);
        assert_eq!([0b0010_0101], buffer);

        CtrlMeas::encode(&CtrlMeasFields {
            osrs_t: Oversampling::X2,
            osrs_p: Oversampling::X16,
            mode: PowerMode::Normal,
        }, &mut buffer);
        assert_eq!([0b0101_0111], buffer);
    }

    #[test]
    fn ctrl_meas_decode_short_buffer() {
        assert_eq!(
            Err(FormatError { expected: 1, actual: 0 }),
            CtrlMeas::decode(&[]).map(|_| ())
        );
    }
}
