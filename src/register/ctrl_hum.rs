//! ### CTRL_HUM - Humidity oversampling (`0xF2`, 1 byte, R/W)
//!
//! Changes to this register only become effective after a write to CTRL_MEAS.
#![doc(alias = "CTRL_HUM")]
use crate::error::FormatError;
use crate::register::{Oversampling, Readable, Reg, Writable};

/// Marker type for CTRL_HUM (0xF2) register
pub struct CtrlHum;
impl Reg for CtrlHum { const ADDR: u8 = 0xF2; }

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlHumFields {
    pub osrs_h: Oversampling,
}

impl Readable for CtrlHum {
    type Out = CtrlHumFields;

    fn decode(b: &[u8]) -> Result<Self::Out, FormatError> {
        FormatError::check(b, <Self as Readable>::N)?;
        Ok(CtrlHumFields {
            osrs_h: Oversampling::from(b[0] & 0b111),
        })
    }
}

impl Writable for CtrlHum {
    type In = CtrlHumFields;

    fn encode(v: &Self::In, out: &mut [u8]) {
        let osrs_h: u8 = v.osrs_h.into();
        out[0] = osrs_h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_hum_decode() {
        let reg = CtrlHum::decode(&[0b0000_0000]).unwrap();
        assert_eq!(Oversampling::Skipped, reg.osrs_h);

        // Upper bits are unused
        let reg = CtrlHum::decode(&[0b1111_1001]).unwrap();
        assert_eq!(Oversampling::X1, reg.osrs_h);
    }

    #[test]
    fn ctrl_hum_encode() {
        let mut buffer = [0u8; 1];
        CtrlHum::encode(&CtrlHumFields { osrs_h: Oversampling::X4 }, &mut buffer);
        assert_eq!([0b0000_0011], buffer);
    }

    #[test]
    fn ctrl_hum_decode_short_buffer() {
        assert_eq!(
            Err(FormatError { expected: 1, actual: 0 }),
            CtrlHum::decode(&[]).map(|_| ())
        );
    }
}
