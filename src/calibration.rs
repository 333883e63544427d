use crate::bus::Bus;
use crate::error::FormatError;
use crate::register::calibration::{
    CalibH1, CalibHum, CalibTempPress, HumidityNvm, TempPressNvm, HUMIDITY_LEN,
};
use crate::Bme280Result;

/// Factory compensation coefficients, converted to `f64` once after decoding.
///
/// Index `n` in each array holds the datasheet word `dig_X(n+1)`, so `temperature[0]` is `dig_T1`
/// and `humidity[5]` is `dig_H6`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationCoefficients {
    temperature: [f64; 3],
    pressure: [f64; 9],
    humidity: [f64; 6],
}

impl CalibrationCoefficients {
    pub fn new(temperature: [f64; 3], pressure: [f64; 9], humidity: [f64; 6]) -> Self {
        Self { temperature, pressure, humidity }
    }

    /// Decodes the 24-byte temperature/pressure block and the 8-byte humidity block.
    ///
    /// Both buffers are length checked before anything is decoded.
    pub fn decode(temp_press: &[u8], humidity: &[u8]) -> Result<Self, FormatError> {
        let tp = TempPressNvm::decode(temp_press)?;
        let h = HumidityNvm::decode(humidity)?;

        Ok(Self::from_nvm(&tp, &h))
    }

    pub fn from_nvm(tp: &TempPressNvm, h: &HumidityNvm) -> Self {
        Self {
            temperature: [tp.dig_t1 as f64, tp.dig_t2 as f64, tp.dig_t3 as f64],
            pressure: [
                tp.dig_p1 as f64,
                tp.dig_p2 as f64,
                tp.dig_p3 as f64,
                tp.dig_p4 as f64,
                tp.dig_p5 as f64,
                tp.dig_p6 as f64,
                tp.dig_p7 as f64,
                tp.dig_p8 as f64,
                tp.dig_p9 as f64,
            ],
            humidity: [
                h.dig_h1 as f64,
                h.dig_h2 as f64,
                h.dig_h3 as f64,
                h.dig_h4 as f64,
                h.dig_h5 as f64,
                h.dig_h6 as f64,
            ],
        }
    }

    /// Reads the three calibration areas and decodes them.
    ///
    /// Must not be called while `STATUS.im_update` is set.
    pub async fn load<B: Bus>(bus: &mut B) -> Bme280Result<Self, B::Error> {
        let tp = bus.read::<CalibTempPress>().await?;
        let h1 = bus.read::<CalibH1>().await?;
        let rest = bus.read::<CalibHum>().await?;

        let mut block = [0u8; HUMIDITY_LEN];
        block[0] = h1;
        block[1..].copy_from_slice(&rest);
        let h = HumidityNvm::decode(&block)?;

        Ok(Self::from_nvm(&tp, &h))
    }

    pub fn temperature(&self) -> &[f64; 3] { &self.temperature }

    pub fn pressure(&self) -> &[f64; 9] { &self.pressure }

    pub fn humidity(&self) -> &[f64; 6] { &self.humidity }
}
