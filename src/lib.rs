//! Async `no_std` driver for the Bosch BME280 temperature, pressure and humidity sensor.
//!
//! The crate is split in two layers:
//!
//! - The device layer ([`Bme280`], [`bus`], [`register`], [`config`]) talks to the chip over I2C or
//!   SPI via `embedded-hal-async`.
//! - The math layer ([`CalibrationCoefficients`], [`CompensationEngine`], [`psychrometrics`]) has
//!   no I/O at all and can be used on recorded raw samples and calibration dumps.
//!
//! ```rust,no_run
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! use bme280_rs::{Bme280, Bme280Result, ResetPolicy, SdoPinState};
//! use bme280_rs::config::{Configuration, Preset};
//!
//! # async fn demo<I: I2c, D: DelayNs>(i2c: I, mut delay: D) -> Bme280Result<(), I::Error> {
//! let config = Configuration::from_preset(Preset::WeatherMonitoring);
//! let mut device = Bme280::new_i2c(i2c, SdoPinState::Low, config, ResetPolicy::Soft, &mut delay).await?;
//!
//! let reading = device.measure(&mut delay).await?;
//! let _dewpoint = reading.dewpoint_celsius();
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), no_std)]
extern crate alloc;

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("The `defmt` and `log` features are mutually exclusive");

// Must come first so the logging macros are visible in the modules below.
mod fmt;

mod bme280;
pub mod bus;
mod calibration;
mod compensation;
pub mod config;
pub mod error;
pub mod labeled;
mod measurement;
pub mod psychrometrics;
pub mod register;

#[cfg(test)]
mod testing;

pub use bme280::{Bme280, Bme280Result, ResetPolicy, SdoPinState};
pub use calibration::CalibrationCoefficients;
pub use compensation::{
    CompensationEngine, FineTemperature, TemperatureSample, ABSOLUTE_ZERO_CELSIUS,
    MAX_RELATIVE_HUMIDITY,
};
pub use error::{Bme280Error, CompensationError, FormatError, LabelError, LengthMismatch};
pub use measurement::CompensatedReading;
pub use register::data::RawMeasurement;
