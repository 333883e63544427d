//! Humidity conversions: saturation vapor pressure, dewpoint and absolute humidity.
//!
//! Constants are from Vaisala's "Humidity Conversion Formulas" (B210973EN-F). The
//! saturation vapor pressure model is good to about 0.1 % between −20 °C and +50 °C. Outside
//! that band values are still returned, just less accurately; use [`is_within_accuracy_range`]
//! to tell the two apart.
//!
//! These functions work on physical quantities only (°C and relative humidity as a *fraction*,
//! 0.0 - 1.0) and are independent of the sensor. Each has a slice form that converts
//! element-wise.
//!
//! ```
//! use bme280_rs::psychrometrics::{relative_to_dewpoint, relative_to_dewpoint_slice};
//!
//! let dewpoint = relative_to_dewpoint(0.5, 25.0);
//! assert!(dewpoint < 25.0);
//! assert_eq!(vec![dewpoint], relative_to_dewpoint_slice(&[0.5], &[25.0]).unwrap());
//! ```
use alloc::vec::Vec;

use crate::error::LengthMismatch;

/// Critical temperature of water in K.
pub const CRITICAL_TEMPERATURE: f64 = 647.096;
/// Critical pressure of water in hPa.
pub const CRITICAL_PRESSURE: f64 = 220640.0;

const COEFFICIENTS: [(f64, f64); 6] = [
    (-7.85951783, 1.0),
    (1.84408259, 1.5),
    (-11.7866497, 3.0),
    (22.6807411, 3.5),
    (-15.9618719, 4.0),
    (1.80122502, 7.5),
];

// Magnus-type dewpoint constants for -20..+50 °C, output in °C
const DEWPOINT_A: f64 = 6.116441;
const DEWPOINT_M: f64 = 7.591386;
const DEWPOINT_TN: f64 = 240.7263;

/// g·K/J
const ABSOLUTE_HUMIDITY_C: f64 = 2.16679;

const KELVIN_OFFSET: f64 = 273.15;
const HPA_TO_PA: f64 = 100.0;

pub const ACCURATE_MIN_CELSIUS: f64 = -20.0;
pub const ACCURATE_MAX_CELSIUS: f64 = 50.0;

/// Saturation vapor pressure over water in hPa at `temperature_k` kelvin.
pub fn saturation_vapor_pressure(temperature_k: f64) -> f64 {
    let v = 1.0 - temperature_k / CRITICAL_TEMPERATURE;
    let sum: f64 = COEFFICIENTS
        .iter()
        .map(|&(c, p)| c * libm::pow(v, p))
        .sum();

    CRITICAL_PRESSURE * libm::exp(CRITICAL_TEMPERATURE / temperature_k * sum)
}

/// Dewpoint in °C for a relative humidity fraction and a temperature in °C.
///
/// The formula has no meaning at `rh == 0.0`: it degenerates to `-Tn` (−240.7263 °C) there
/// instead of diverging. Callers holding dry-air readings should not ask for a dewpoint.
pub fn relative_to_dewpoint(rh: f64, temperature_c: f64) -> f64 {
    let pw = saturation_vapor_pressure(temperature_c + KELVIN_OFFSET) * rh;

    DEWPOINT_TN / (DEWPOINT_M / libm::log10(pw / DEWPOINT_A) - 1.0)
}

/// Absolute humidity for a relative humidity fraction and a temperature in °C: `C·Pw/T` with the
/// vapor pressure `Pw` in hPa, as the Vaisala formula is usually applied to this model.
///
/// `C` is defined for `Pw` in Pa, so the result is 1/100 of the mass density in g/m³. Use
/// [`relative_to_absolute_grams_per_cubic_meter`] for the physically scaled value.
pub fn relative_to_absolute(rh: f64, temperature_c: f64) -> f64 {
    let temperature_k = temperature_c + KELVIN_OFFSET;
    let pw = saturation_vapor_pressure(temperature_k) * rh;

    ABSOLUTE_HUMIDITY_C * pw / temperature_k
}

/// Absolute humidity in g/m³ (vapor pressure taken in Pa).
pub fn relative_to_absolute_grams_per_cubic_meter(rh: f64, temperature_c: f64) -> f64 {
    relative_to_absolute(rh, temperature_c) * HPA_TO_PA
}

pub fn relative_to_dewpoint_slice(rh: &[f64], temperature_c: &[f64]) -> Result<Vec<f64>, LengthMismatch> {
    zip_with(rh, temperature_c, relative_to_dewpoint)
}

pub fn relative_to_absolute_slice(rh: &[f64], temperature_c: &[f64]) -> Result<Vec<f64>, LengthMismatch> {
    zip_with(rh, temperature_c, relative_to_absolute)
}

pub fn saturation_vapor_pressure_slice(temperature_k: &[f64]) -> Vec<f64> {
    temperature_k.iter().map(|&t| saturation_vapor_pressure(t)).collect()
}

/// Whether the model is within its stated accuracy at `temperature_c`.
pub fn is_within_accuracy_range(temperature_c: f64) -> bool {
    (ACCURATE_MIN_CELSIUS..=ACCURATE_MAX_CELSIUS).contains(&temperature_c)
}

pub fn celsius_to_fahrenheit(temperature_c: f64) -> f64 {
    temperature_c * 1.8 + 32.0
}

fn zip_with(
    rh: &[f64],
    temperature_c: &[f64],
    f: fn(f64, f64) -> f64,
) -> Result<Vec<f64>, LengthMismatch> {
    if rh.len() != temperature_c.len() {
        return Err(LengthMismatch {
            relative_humidity: rh.len(),
            temperature: temperature_c.len(),
        });
    }

    Ok(rh.iter().zip(temperature_c).map(|(&h, &t)| f(h, t)).collect())
}
