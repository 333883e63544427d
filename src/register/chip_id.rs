//! ### CHIP_ID - Chip identification number (`0xD0`, 1 byte, R)
//!
//! Contains the chip identification code, which will always be 0x60 for BME280.
//! (A BMP280 answers 0x56..=0x58 here, which is how the two are told apart.)
//!
//! ### Examples
//! ```rust,no_run
//! # use bme280_rs::{Bme280, Bme280Result};
//! # use bme280_rs::bus::Bus;
//! # async fn demo<B: Bus>(mut device: Bme280<B>)
//! #     -> Bme280Result<(), B::Error> {
//! use bme280_rs::register::chip_id::ChipId;
//!
//! let id = device.read::<ChipId>().await?;
//! assert_eq!(0x60, id);
//! # Ok(()) }
//! ```
#![doc(alias = "CHIP_ID")]
use crate::error::FormatError;
use crate::register::{Readable, Reg};

/// Marker struct for the CHIP_ID (0xD0) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0xD0; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, Self::N)?;
        Ok(b[0])
    }
}
