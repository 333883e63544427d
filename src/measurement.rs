use crate::psychrometrics;

/// One compensated sample.
///
/// Temperature is always present. Pressure and humidity are `None` when their oversampling was
/// set to [`Skipped`](crate::register::Oversampling::Skipped).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompensatedReading {
    temperature_c: f64,
    pressure_pa: Option<f64>,
    humidity_rh: Option<f64>,
}

impl CompensatedReading {
    pub fn new(temperature_c: f64, pressure_pa: Option<f64>, humidity_rh: Option<f64>) -> Self {
        Self { temperature_c, pressure_pa, humidity_rh }
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_c
    }

    pub fn temperature_fahrenheit(&self) -> f64 {
        psychrometrics::celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn pressure_pascal(&self) -> Option<f64> {
        self.pressure_pa
    }

    pub fn pressure_hpa(&self) -> Option<f64> {
        self.pressure_pa.map(|p| p / 100.0)
    }

    /// Relative humidity in percent (0 - 100).
    pub fn humidity_percent(&self) -> Option<f64> {
        self.humidity_rh
    }

    /// Dewpoint in °C. See [`psychrometrics::relative_to_dewpoint`] for the accuracy range.
    ///
    /// `None` when humidity was skipped, and also at 0 %RH (the compensation clamp can produce
    /// it), where dry air has no dewpoint.
    pub fn dewpoint_celsius(&self) -> Option<f64> {
        self.humidity_rh
            .filter(|&rh| rh > 0.0)
            .map(|rh| psychrometrics::relative_to_dewpoint(rh / 100.0, self.temperature_c))
    }

    /// Absolute humidity as [`psychrometrics::relative_to_absolute`] defines it (1/100 of g/m³).
    pub fn absolute_humidity(&self) -> Option<f64> {
        self.humidity_rh
            .map(|rh| psychrometrics::relative_to_absolute(rh / 100.0, self.temperature_c))
    }

    /// Absolute humidity in g/m³.
    pub fn absolute_humidity_grams_per_cubic_meter(&self) -> Option<f64> {
        self.humidity_rh.map(|rh| {
            psychrometrics::relative_to_absolute_grams_per_cubic_meter(rh / 100.0, self.temperature_c)
        })
    }
}

#[cfg(feature = "uom")]
impl CompensatedReading {
    pub fn temperature_uom(&self) -> uom::si::f64::ThermodynamicTemperature {
        use uom::si::thermodynamic_temperature::degree_celsius;
        uom::si::f64::ThermodynamicTemperature::new::<degree_celsius>(self.temperature_c)
    }

    pub fn pressure_uom(&self) -> Option<uom::si::f64::Pressure> {
        use uom::si::pressure::pascal;
        self.pressure_pa.map(uom::si::f64::Pressure::new::<pascal>)
    }

    pub fn humidity_uom(&self) -> Option<uom::si::f64::Ratio> {
        use uom::si::ratio::percent;
        self.humidity_rh.map(uom::si::f64::Ratio::new::<percent>)
    }

    pub fn absolute_humidity_uom(&self) -> Option<uom::si::f64::MassDensity> {
        use uom::si::mass_density::gram_per_cubic_meter;
        self.absolute_humidity_grams_per_cubic_meter()
            .map(uom::si::f64::MassDensity::new::<gram_per_cubic_meter>)
    }
}
