use crate::register::config::{FilterCoefficient, StandbyTime};
use crate::register::ctrl_meas::PowerMode;
use crate::register::Oversampling;

/// Device settings applied by [`Bme280::apply_configuration`](crate::Bme280::apply_configuration).
///
/// Built with chained setters on top of [`Configuration::default`] or a [`Preset`]:
///
/// ```
/// use bme280_rs::config::Configuration;
/// use bme280_rs::register::Oversampling;
/// use bme280_rs::register::ctrl_meas::PowerMode;
///
/// let config = Configuration::default()
///     .humidity_oversampling(Oversampling::Skipped)
///     .power_mode(PowerMode::Forced);
/// assert_eq!(6_425, config.max_measurement_time_us());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) temperature_oversampling: Oversampling,
    pub(crate) pressure_oversampling: Oversampling,
    pub(crate) humidity_oversampling: Oversampling,
    pub(crate) mode: PowerMode,
    pub(crate) standby: StandbyTime,
    pub(crate) filter: FilterCoefficient,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            humidity_oversampling: Oversampling::X1,
            mode: PowerMode::Normal,
            standby: StandbyTime::Ms1000,
            filter: FilterCoefficient::Off,
        }
    }
}

impl Configuration {
    /// Temperature oversampling.
    ///
    /// Pressure and humidity compensation need a temperature from the same burst, so skipping
    /// temperature makes [`Bme280::read_measurement`](crate::Bme280::read_measurement) fail.
    pub fn temperature_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.temperature_oversampling = oversampling;

        self
    }

    pub fn pressure_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.pressure_oversampling = oversampling;

        self
    }

    pub fn humidity_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.humidity_oversampling = oversampling;

        self
    }

    pub fn power_mode(mut self, mode: PowerMode) -> Self {
        self.mode = mode;

        self
    }

    /// Inactive time between measurements. Only used in [`PowerMode::Normal`].
    pub fn standby_time(mut self, standby: StandbyTime) -> Self {
        self.standby = standby;

        self
    }

    pub fn iir_filter_coefficient(mut self, filter: FilterCoefficient) -> Self {
        self.filter = filter;

        self
    }

    /// The recommended settings from section 3.5 of the datasheet.
    pub fn from_preset(p: Preset) -> Self {
        match p {
            Preset::WeatherMonitoring => Configuration::default()
                .power_mode(PowerMode::Forced),
            Preset::HumiditySensing => Configuration::default()
                .power_mode(PowerMode::Forced)
                .pressure_oversampling(Oversampling::Skipped),
            Preset::IndoorNavigation => Configuration::default()
                .temperature_oversampling(Oversampling::X2)
                .pressure_oversampling(Oversampling::X16)
                .standby_time(StandbyTime::Ms0p5)
                .iir_filter_coefficient(FilterCoefficient::Coef16),
            Preset::Gaming => Configuration::default()
                .pressure_oversampling(Oversampling::X4)
                .humidity_oversampling(Oversampling::Skipped)
                .standby_time(StandbyTime::Ms0p5)
                .iir_filter_coefficient(FilterCoefficient::Coef16),
        }
    }

    /// Worst-case duration of one measurement cycle in µs (datasheet appendix B).
    pub fn max_measurement_time_us(&self) -> u32 {
        let channel = |o: Oversampling, overhead: u32| {
            if o.is_enabled() { 2300 * o.factor() + overhead } else { 0 }
        };

        1250
            + channel(self.temperature_oversampling, 0)
            + channel(self.pressure_oversampling, 575)
            + channel(self.humidity_oversampling, 575)
    }

    pub fn temperature(&self) -> Oversampling { self.temperature_oversampling }

    pub fn pressure(&self) -> Oversampling { self.pressure_oversampling }

    pub fn humidity(&self) -> Oversampling { self.humidity_oversampling }

    pub fn mode(&self) -> PowerMode { self.mode }

    pub fn standby(&self) -> StandbyTime { self.standby }

    pub fn filter(&self) -> FilterCoefficient { self.filter }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    WeatherMonitoring,
    HumiditySensing,
    IndoorNavigation,
    Gaming,
}
