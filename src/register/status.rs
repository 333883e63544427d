use crate::error::FormatError;
use crate::register::{Readable, Reg};

/// Marker struct for the STATUS (0xF3) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
///
/// Used with [`Bme280::read::<Status>()`](crate::Bme280::read) or the convenience method
/// [`Bme280::status`](crate::Bme280::status).
pub struct Status;

impl Reg for Status { const ADDR: u8 = 0xF3; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    measuring: bool,
    im_update: bool,
}

impl StatusFlags {
    pub fn new(measuring: bool, im_update: bool) -> Self {
        Self { measuring, im_update }
    }

    /// Is a conversion running?
    ///
    /// Goes back to [`false`] once the results have been transferred to the data registers.
    pub fn measuring(&self) -> bool { self.measuring }

    /// Is the NVM being copied to the image registers?
    ///
    /// This happens at power on and after a soft reset. Calibration data must not be read while it is set.
    pub fn nvm_copying(&self) -> bool { self.im_update }
}

impl Readable for Status {
    type Out = StatusFlags;
    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, Self::N)?;
        Ok(StatusFlags {
            measuring: (b[0] & 0b0000_1000) != 0,
            im_update: (b[0] & 0b0000_0001) != 0,
        })
    }
}
