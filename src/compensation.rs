//! Floating-point compensation of raw ADC values, following the reference formulas in section 8.1
//! of the BME280 datasheet.
//!
//! Pressure and humidity compensation both depend on `t_fine`, an intermediate produced by
//! temperature compensation of the *same* sample. There are two ways to respect that ordering:
//!
//! - [`CalibrationCoefficients::begin_sample`] returns a [`TemperatureSample`] that owns the
//!   sample's [`FineTemperature`]. Pressure and humidity are methods on it, so calling them before
//!   temperature does not compile.
//! - [`CompensationEngine`] keeps the value in an `Uninitialized`/`TempReady` state and reports
//!   out-of-order calls with [`CompensationError::Sequence`].
//!
//! All arithmetic is done in `f64`. Nothing is rounded; only the final results are clamped to
//! their physical range.
//!
//! ```
//! use bme280_rs::{CalibrationCoefficients, CompensationEngine};
//!
//! let coefficients = CalibrationCoefficients::new(
//!     [27504.0, 26435.0, -1000.0],
//!     [36477.0, -10685.0, 3024.0, 2855.0, 140.0, -7.0, 15500.0, -14600.0, 6000.0],
//!     [75.0, 375.0, 0.0, 28.0, 0.0, 30.0],
//! );
//!
//! let sample = coefficients.begin_sample(519888);
//! assert!((sample.celsius() - 25.08).abs() < 0.01);
//! assert!((sample.pressure(415148).unwrap() - 100653.27).abs() < 0.01);
//!
//! let mut engine = CompensationEngine::new(coefficients);
//! assert!(engine.calibrate_humidity(9000).is_err());
//! engine.calibrate_temperature(519888);
//! assert!(engine.calibrate_humidity(9000).is_ok());
//! ```
use crate::calibration::CalibrationCoefficients;
use crate::error::CompensationError;
use crate::measurement::CompensatedReading;
use crate::register::data::RawMeasurement;

pub const ABSOLUTE_ZERO_CELSIUS: f64 = -273.15;
pub const MAX_RELATIVE_HUMIDITY: f64 = 100.0;

/// The `t_fine` intermediate of one sample.
///
/// Deliberately neither `Copy` nor `Clone`: a value is produced by temperature compensation and
/// belongs to that sample only.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FineTemperature(f64);

impl FineTemperature {
    /// Wraps a previously recorded `t_fine`, e.g. one replayed from a log.
    pub fn from_raw_value(t_fine: f64) -> Self {
        Self(t_fine)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Temperature in °C, never below absolute zero.
    pub fn celsius(&self) -> f64 {
        (self.0 / 5120.0).max(ABSOLUTE_ZERO_CELSIUS)
    }
}

impl CalibrationCoefficients {
    /// Runs the temperature formula and returns the sample's `t_fine`.
    pub fn fine_temperature(&self, raw_temperature: u32) -> FineTemperature {
        let [t1, t2, t3] = *self.temperature();
        let raw = raw_temperature as f64;

        let var1 = (raw / 16384.0 - t1 / 1024.0) * t2;
        let d = raw / 131072.0 - t1 / 8192.0;
        let var2 = d * d * t3;

        FineTemperature(var1 + var2)
    }

    /// Pressure in Pa, never negative.
    ///
    /// Returns [`CompensationError::DivisionByZero`] when `dig_P1` (or the temperature dependent
    /// term scaling it) makes the divisor zero.
    pub fn compensate_pressure(
        &self,
        fine: &FineTemperature,
        raw_pressure: u32,
    ) -> Result<f64, CompensationError> {
        let [p1, p2, p3, p4, p5, p6, p7, p8, p9] = *self.pressure();

        let mut var1 = fine.0 / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * p6 / 32768.0 + var1 * p5 * 2.0;
        var2 = var2 / 4.0 + p4 * 65536.0;
        var1 = (p3 * var1 * var1 / 524288.0 + p2 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * p1;
        if var1 == 0.0 {
            return Err(CompensationError::DivisionByZero);
        }

        let p = (1048576.0 - raw_pressure as f64 - var2 / 4096.0) * 6250.0 / var1;
        let var1 = p9 * p * p / 2147483648.0;
        let var2 = p * p8 / 32768.0;

        Ok((p + (var1 + var2 + p7) / 16.0).max(0.0))
    }

    /// Relative humidity in %, clamped to `0..=100`.
    pub fn compensate_humidity(&self, fine: &FineTemperature, raw_humidity: u16) -> f64 {
        let [h1, h2, h3, h4, h5, h6] = *self.humidity();

        let v = fine.0 - 76800.0;
        let v = (raw_humidity as f64 - (h4 * 64.0 + h5 / 16384.0 * v))
            * (h2 / 65536.0 * (1.0 + h6 / 67108864.0 * v * (1.0 + h3 / 67108864.0 * v)));

        (v * (1.0 - h1 * v / 524288.0)).clamp(0.0, MAX_RELATIVE_HUMIDITY)
    }

    /// Compensates the temperature of a new sample and returns a handle for the rest of it.
    pub fn begin_sample(&self, raw_temperature: u32) -> TemperatureSample<'_> {
        TemperatureSample {
            coefficients: self,
            fine: self.fine_temperature(raw_temperature),
        }
    }
}

/// One sample whose temperature has been compensated.
#[derive(Debug)]
pub struct TemperatureSample<'a> {
    coefficients: &'a CalibrationCoefficients,
    fine: FineTemperature,
}

impl TemperatureSample<'_> {
    pub fn celsius(&self) -> f64 {
        self.fine.celsius()
    }

    pub fn fine_temperature(&self) -> &FineTemperature {
        &self.fine
    }

    pub fn pressure(&self, raw_pressure: u32) -> Result<f64, CompensationError> {
        self.coefficients.compensate_pressure(&self.fine, raw_pressure)
    }

    pub fn humidity(&self, raw_humidity: u16) -> f64 {
        self.coefficients.compensate_humidity(&self.fine, raw_humidity)
    }
}

#[derive(Debug, PartialEq)]
enum FineState {
    Uninitialized,
    TempReady(FineTemperature),
}

/// Stateful per-sample converter owning one sensor's coefficients.
///
/// Call [`calibrate_temperature`](Self::calibrate_temperature) first for every sample, then any
/// number of pressure/humidity calibrations. Use one engine per sample stream; the `t_fine` it
/// holds is shared by the three calls of a single sample.
#[derive(Debug)]
pub struct CompensationEngine {
    coefficients: CalibrationCoefficients,
    state: FineState,
}

impl CompensationEngine {
    pub fn new(coefficients: CalibrationCoefficients) -> Self {
        Self {
            coefficients,
            state: FineState::Uninitialized,
        }
    }

    pub fn coefficients(&self) -> &CalibrationCoefficients {
        &self.coefficients
    }

    /// Starts a new sample: compensates temperature and replaces the stored `t_fine`.
    pub fn calibrate_temperature(&mut self, raw_temperature: u32) -> f64 {
        let fine = self.coefficients.fine_temperature(raw_temperature);
        let celsius = fine.celsius();
        self.state = FineState::TempReady(fine);

        celsius
    }

    pub fn calibrate_pressure(&self, raw_pressure: u32) -> Result<f64, CompensationError> {
        self.coefficients.compensate_pressure(self.fine()?, raw_pressure)
    }

    pub fn calibrate_humidity(&self, raw_humidity: u16) -> Result<f64, CompensationError> {
        Ok(self.coefficients.compensate_humidity(self.fine()?, raw_humidity))
    }

    /// The current sample's `t_fine`, if temperature has been compensated.
    pub fn fine_temperature(&self) -> Option<f64> {
        match &self.state {
            FineState::Uninitialized => None,
            FineState::TempReady(fine) => Some(fine.value()),
        }
    }

    /// Forgets the current sample.
    pub fn reset(&mut self) {
        self.state = FineState::Uninitialized;
    }

    /// Compensates a whole burst in order. Skipped pressure/humidity channels come back as `None`.
    ///
    /// A skipped temperature channel leaves nothing to compensate the other two against: the
    /// engine is reset and [`CompensationError::Sequence`] is returned.
    pub fn compensate(&mut self, raw: &RawMeasurement) -> Result<CompensatedReading, CompensationError> {
        if raw.temperature_skipped() {
            self.reset();
            return Err(CompensationError::Sequence);
        }

        let temperature = self.calibrate_temperature(raw.temperature());
        let pressure = (!raw.pressure_skipped())
            .then(|| self.calibrate_pressure(raw.pressure()))
            .transpose()?;
        let humidity = (!raw.humidity_skipped())
            .then(|| self.calibrate_humidity(raw.humidity()))
            .transpose()?;

        Ok(CompensatedReading::new(temperature, pressure, humidity))
    }

    fn fine(&self) -> Result<&FineTemperature, CompensationError> {
        match &self.state {
            FineState::TempReady(fine) => Ok(fine),
            FineState::Uninitialized => Err(CompensationError::Sequence),
        }
    }
}
