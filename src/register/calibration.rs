//! Factory trimming parameters (calibration NVM).
//!
//! The BME280 keeps its compensation words in two areas of the memory map:
//!
//! | Area | Bytes | Contents |
//! |------|-------|----------|
//! | `0x88..=0x9F` | 24 | `dig_T1..dig_T3`, `dig_P1..dig_P9`, little-endian 16-bit |
//! | `0xA1` | 1 | `dig_H1` |
//! | `0xE1..=0xE7` | 7 | `dig_H2..dig_H6`, partly nibble packed |
//!
//! The humidity words are handled as one 8-byte block: `0xA1` followed by `0xE1..=0xE7`.
//! `dig_H4` and `dig_H5` are 12-bit signed values sharing register `0xE5` (datasheet table 16):
//!
//! ```text
//! dig_H4 = 0xE4[7:0] << 4 | 0xE5[3:0]
//! dig_H5 = 0xE6[7:0] << 4 | 0xE5[7:4]
//! ```
use crate::error::FormatError;
use crate::register::{Readable, Reg};

/// Marker struct for the temperature and pressure calibration block (0x88 - 0x9F)
pub struct CalibTempPress;
impl Reg for CalibTempPress { const ADDR: u8 = 0x88; }

/// Marker struct for the `dig_H1` calibration register (0xA1)
pub struct CalibH1;
impl Reg for CalibH1 { const ADDR: u8 = 0xA1; }

/// Marker struct for the remaining humidity calibration registers (0xE1 - 0xE7)
pub struct CalibHum;
impl Reg for CalibHum { const ADDR: u8 = 0xE1; }

pub const TEMP_PRESS_LEN: usize = 24;
pub const HUMIDITY_LEN: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TempPressNvm {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl TempPressNvm {
    pub fn decode(b: &[u8]) -> Result<Self, FormatError> {
        FormatError::check(b, TEMP_PRESS_LEN)?;
        let s = |i: usize| i16::from_le_bytes([b[i], b[i + 1]]);

        Ok(Self {
            dig_t1: u16::from_le_bytes([b[0], b[1]]),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u16::from_le_bytes([b[6], b[7]]),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        })
    }

    pub fn encode(&self) -> [u8; TEMP_PRESS_LEN] {
        let mut out = [0u8; TEMP_PRESS_LEN];
        out[0..2].copy_from_slice(&self.dig_t1.to_le_bytes());
        out[6..8].copy_from_slice(&self.dig_p1.to_le_bytes());

        let signed = [
            (2, self.dig_t2),
            (4, self.dig_t3),
            (8, self.dig_p2),
            (10, self.dig_p3),
            (12, self.dig_p4),
            (14, self.dig_p5),
            (16, self.dig_p6),
            (18, self.dig_p7),
            (20, self.dig_p8),
            (22, self.dig_p9),
        ];
        for (offset, value) in signed {
            out[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }

        out
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HumidityNvm {
    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl HumidityNvm {
    /// Decodes the 8-byte humidity block (`0xA1`, then `0xE1..=0xE7`).
    pub fn decode(b: &[u8]) -> Result<Self, FormatError> {
        FormatError::check(b, HUMIDITY_LEN)?;

        Ok(Self {
            dig_h1: b[0],
            dig_h2: i16::from_le_bytes([b[1], b[2]]),
            dig_h3: b[3],
            dig_h4: (b[4] as i8 as i16) * 16 | (b[5] & 0x0F) as i16,
            dig_h5: (b[6] as i8 as i16) * 16 | (b[5] >> 4) as i16,
            dig_h6: b[7] as i8,
        })
    }

    /// Packs the words back into the 8-byte block layout.
    ///
    /// `dig_h4`/`dig_h5` only carry 12 significant bits; higher bits are dropped.
    pub fn encode(&self) -> [u8; HUMIDITY_LEN] {
        let h2 = self.dig_h2.to_le_bytes();
        [
            self.dig_h1,
            h2[0],
            h2[1],
            self.dig_h3,
            (self.dig_h4 >> 4) as u8,
            (self.dig_h4 & 0x0F) as u8 | ((self.dig_h5 & 0x0F) as u8) << 4,
            (self.dig_h5 >> 4) as u8,
            self.dig_h6 as u8,
        ]
    }
}

impl Readable for CalibTempPress {
    type Out = TempPressNvm;

    const N: usize = TEMP_PRESS_LEN;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        TempPressNvm::decode(b)
    }
}

impl Readable for CalibH1 {
    type Out = u8;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, Self::N)?;
        Ok(b[0])
    }
}

impl Readable for CalibHum {
    type Out = [u8; 7];

    const N: usize = 7;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, Self::N)?;
        let mut out = [0u8; 7];
        out.copy_from_slice(&b[..7]);

        Ok(out)
    }
}
