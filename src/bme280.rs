use crate::bus::{Bus, I2c, Spi};
use crate::calibration::CalibrationCoefficients;
use crate::compensation::CompensationEngine;
use crate::config::Configuration;
use crate::error::Bme280Error;
use crate::measurement::CompensatedReading;
use crate::register::config::{Config, ConfigFields};
use crate::register::ctrl_hum::{CtrlHum, CtrlHumFields};
use crate::register::ctrl_meas::{CtrlMeas, CtrlMeasFields, PowerMode};
use crate::register::data::{Data, RawMeasurement};
use crate::register::reset::{Reset, ResetCommand};
use crate::register::{chip_id, status, Readable, Writable};
use embedded_hal::i2c::SevenBitAddress;
use embedded_hal_async::delay::DelayNs;

/// Type alias for a Bme280 chip communicating over I2C
type Bme280I2c<T> = Bme280<I2c<T>>;

/// Type alias for a Bme280 chip communicating over SPI
type Bme280Spi<T> = Bme280<Spi<T>>;

const BME280_CHIP_ID: u8 = 0x60;

// Polls of STATUS before giving up on an NVM copy or a forced conversion.
const MAX_STATUS_POLLS: u8 = 32;

/// Main Bme280 driver struct
pub struct Bme280<B> {
    bus: B,
    engine: CompensationEngine,
    config: Configuration,
}

/// Type alias used to simplify return types throughout the driver
pub type Bme280Result<T, BusError> = Result<T, Bme280Error<BusError>>;

impl<T> Bme280I2c<T>
where
    T: embedded_hal_async::i2c::I2c,
    I2c<T>: Bus,
{
    /// Constructs a new Bme280 driver instance with a given configuration that communicates over I2C
    ///
    /// This function will:
    /// - Probe for a connected BME280 device.
    /// - Perform a soft reset if `reset` == [`ResetPolicy::Soft`]
    /// - Load calibration coefficients from NVM
    /// - Apply the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::i2c::I2c;
    /// # use bme280_rs::Bme280Result;
    ///  use bme280_rs::{Bme280, SdoPinState, ResetPolicy};
    ///  use bme280_rs::config::Configuration;
    /// # async fn demo<I: I2c, D: DelayNs>(i2c: I, mut delay: D) -> Bme280Result<(), I::Error> {
    ///
    ///  let device = Bme280::new_i2c(
    ///     i2c,
    ///     SdoPinState::Low,
    ///     Configuration::default(),
    ///     ResetPolicy::Soft,
    ///     &mut delay
    ///  ).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_i2c<D: DelayNs>(
        i2c: T,
        sdo_pin_state: SdoPinState,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bme280Result<Self, <I2c<T> as Bus>::Error> {
        Self::new(I2c::new(i2c, sdo_pin_state.into()), config, reset, delay).await
    }
}

impl<T> Bme280Spi<T>
where
    T: embedded_hal_async::spi::SpiDevice,
    Spi<T>: Bus,
{
    /// Constructs a new Bme280 driver instance with a given configuration that communicates over 4-wire SPI
    ///
    /// See [`Bme280::new_i2c`] for the start-up sequence.
    pub async fn new_spi<D: DelayNs>(
        spi: T,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bme280Result<Self, <Spi<T> as Bus>::Error> {
        Self::new(Spi::new(spi), config, reset, delay).await
    }
}

impl<B> Bme280<B>
where
    B: Bus,
{
    /// Probes if the device is ready by attempting to read ChipId `attempts` times with a 1 ms delay.
    ///
    /// Returns [`Bme280Error::NotConnected`] if no response is received.
    async fn probe_ready<D: DelayNs>(
        bus: &mut B,
        delay: &mut D,
        attempts: u32,
    ) -> Bme280Result<(), B::Error> {
        for _ in 0..attempts {
            match bus.read::<chip_id::ChipId>().await {
                Ok(BME280_CHIP_ID) => return Ok(()),
                Ok(id) => warn!("unexpected chip id 0x{:x}", id),
                Err(_) => trace!("chip id read failed, retrying"),
            }

            delay.delay_ms(1).await;
        }

        error!("no BME280 answered the chip id probe");
        Err(Bme280Error::NotConnected)
    }

    /// Creates a driver on top of any [`Bus`], e.g. a recorded register dump.
    pub async fn new<D: DelayNs>(
        mut bus: B,
        config: Configuration,
        reset: ResetPolicy,
        delay: &mut D,
    ) -> Bme280Result<Self, B::Error> {
        // The datasheet (table 1) specifies 2 ms start-up time after VDD/VDDIO are up
        Self::probe_ready(&mut bus, delay, 5).await?;

        if reset == ResetPolicy::Soft {
            Self::reset_bus(&mut bus, delay).await?;
        }

        let coefficients = CalibrationCoefficients::load(&mut bus).await?;
        debug!("calibration loaded, dig_T1 = {}", coefficients.temperature()[0]);

        let mut device = Bme280 {
            bus,
            engine: CompensationEngine::new(coefficients),
            config,
        };

        device.apply_configuration(&config).await?;

        Ok(device)
    }

    /// Applies the given configuration by writing CTRL_HUM, CONFIG and CTRL_MEAS, in that order.
    ///
    /// CTRL_HUM only takes effect after the CTRL_MEAS write, and CONFIG writes may be ignored in
    /// normal mode, so CTRL_MEAS (which carries the mode) goes last.
    pub async fn apply_configuration(&mut self, config: &Configuration) -> Bme280Result<(), B::Error> {
        self.bus
            .write::<CtrlHum>(&CtrlHumFields { osrs_h: config.humidity_oversampling })
            .await?;

        self.bus
            .write::<Config>(&ConfigFields {
                standby: config.standby,
                filter: config.filter,
                spi3w_en: false,
            })
            .await?;

        self.bus
            .write::<CtrlMeas>(&CtrlMeasFields {
                osrs_t: config.temperature_oversampling,
                osrs_p: config.pressure_oversampling,
                mode: config.mode,
            })
            .await?;

        self.config = *config;
        debug!("configuration applied, max measurement time {} us", config.max_measurement_time_us());

        Ok(())
    }

    /// Read a register (or fixed-size register block) using a **typed marker** from
    /// [`crate::register`].
    ///
    /// ```rust,no_run
    /// # use bme280_rs::{register, Bme280, Bme280Result};
    /// # use bme280_rs::bus::Bus;
    /// # async fn demo<B: Bus>(mut device: Bme280<B>) -> Bme280Result<(), B::Error> {
    /// let id: u8 = device.read::<register::chip_id::ChipId>().await?;
    /// assert_eq!(id, 0x60);
    /// # Ok(()) }
    /// ```
    pub async fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, B::Error> {
        self.bus.read::<R>().await
    }

    /// Write a register using a **typed marker** from [`crate::register`].
    ///
    /// This performs a direct write. Settings written this way are not reflected in
    /// [`configuration`](Self::configuration).
    pub async fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), B::Error> {
        self.bus.write::<W>(v).await
    }

    /// Determines if the BME280 device is connected by attempting to read the [`ChipId`](chip_id::ChipId) (0xD0) register.
    pub async fn is_connected(&mut self) -> Bme280Result<bool, B::Error> {
        let id = self.bus.read::<chip_id::ChipId>().await?;

        Ok(id == BME280_CHIP_ID)
    }

    async fn reset_bus<D: DelayNs>(bus: &mut B, delay: &mut D) -> Bme280Result<(), B::Error> {
        bus.write::<Reset>(&ResetCommand::SoftReset).await?;

        // Start-up time applies again after a reset
        delay.delay_ms(2).await;

        for _ in 0..MAX_STATUS_POLLS {
            if !bus.read::<status::Status>().await?.nvm_copying() {
                return Ok(());
            }
            delay.delay_ms(1).await;
        }

        error!("NVM copy did not finish after soft reset");
        Err(Bme280Error::Timeout)
    }

    /// Triggers a soft reset and waits for the NVM copy to finish.
    ///
    /// **Note:** This resets the chip to factory defaults, not to the configuration that was
    /// provided when constructing the driver. Call [`apply_configuration`](Self::apply_configuration)
    /// afterwards. Calibration coefficients are not affected.
    pub async fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> Bme280Result<(), B::Error> {
        Self::reset_bus(&mut self.bus, delay).await?;
        self.engine.reset();

        Ok(())
    }

    /// Returns the status from the STATUS (0xF3) register.
    pub async fn status(&mut self) -> Bme280Result<status::StatusFlags, B::Error> {
        self.bus.read::<status::Status>().await
    }

    pub async fn set_mode(&mut self, mode: PowerMode) -> Bme280Result<(), B::Error> {
        let mut ctrl_meas = self.bus.read::<CtrlMeas>().await?;
        ctrl_meas.mode = mode;
        self.bus.write::<CtrlMeas>(&ctrl_meas).await?;
        self.config.mode = mode;

        Ok(())
    }

    pub async fn mode(&mut self) -> Bme280Result<PowerMode, B::Error> {
        Ok(self.bus.read::<CtrlMeas>().await?.mode)
    }

    /// The coefficients read from the device at start-up.
    pub fn calibration(&self) -> &CalibrationCoefficients {
        self.engine.coefficients()
    }

    /// The configuration last applied through this driver.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Burst-reads the data registers without compensating them.
    pub async fn read_raw_measurement(&mut self) -> Bme280Result<RawMeasurement, B::Error> {
        self.bus.read::<Data>().await
    }

    /// Reads the data registers and compensates them.
    ///
    /// Channels whose oversampling is [`Skipped`](crate::register::Oversampling::Skipped) come back
    /// as `None`.
    pub async fn read_measurement(&mut self) -> Bme280Result<CompensatedReading, B::Error> {
        let raw = self.read_raw_measurement().await?;
        trace!(
            "raw sample t={} p={} h={}",
            raw.temperature(),
            raw.pressure(),
            raw.humidity()
        );

        Ok(self.engine.compensate(&raw)?)
    }

    /// Runs one forced-mode conversion and returns its result.
    ///
    /// Waits [`max_measurement_time_us`](Self::max_measurement_time_us), then polls STATUS until
    /// the conversion is done. The device is back in sleep mode afterwards.
    pub async fn measure<D: DelayNs>(&mut self, delay: &mut D) -> Bme280Result<CompensatedReading, B::Error> {
        self.bus
            .write::<CtrlMeas>(&CtrlMeasFields {
                osrs_t: self.config.temperature_oversampling,
                osrs_p: self.config.pressure_oversampling,
                mode: PowerMode::Forced,
            })
            .await?;
        self.config.mode = PowerMode::Sleep;

        delay.delay_us(self.max_measurement_time_us()).await;

        for _ in 0..MAX_STATUS_POLLS {
            if !self.status().await?.measuring() {
                return self.read_measurement().await;
            }
            delay.delay_ms(1).await;
        }

        error!("forced conversion did not finish");
        Err(Bme280Error::Timeout)
    }

    /// Worst-case duration of one conversion with the current configuration.
    pub fn max_measurement_time_us(&self) -> u32 {
        self.config.max_measurement_time_us()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdoPinState {
    High,
    Low,
}

impl From<SdoPinState> for SevenBitAddress {
    fn from(state: SdoPinState) -> SevenBitAddress {
        match state {
            SdoPinState::High => 0x77,
            SdoPinState::Low => 0x76,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetPolicy {
    Soft,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompensationError;
    use crate::register::calibration::{CalibH1, CalibHum, CalibTempPress};
    use crate::register::chip_id::ChipId;
    use crate::register::status::Status;
    use crate::register::Oversampling;
    use crate::testing::{golden_coefficients, FakeBus, FakeDelay, DATA, HUMIDITY, TEMP_PRESS};

    fn device_bus() -> FakeBus<10> {
        let mut bus: FakeBus<10> = FakeBus::new();
        bus.with_response::<ChipId>(&[0x60]);
        bus.with_response::<Status>(&[0]);
        bus.with_response::<CalibTempPress>(&TEMP_PRESS);
        bus.with_response::<CalibH1>(&HUMIDITY[..1]);
        bus.with_response::<CalibHum>(&HUMIDITY[1..]);
        bus
    }

    fn assert_close(expected: f64, actual: f64, tolerance: f64) {
        assert!((expected - actual).abs() <= tolerance, "expected {expected}, got {actual}");
    }

    #[tokio::test]
    async fn bme280_read_measurement() {
        let mut bus = device_bus();
        bus.with_response::<Data>(&DATA);

        let mut device = Bme280::new(bus, Configuration::default(), ResetPolicy::None, &mut FakeDelay {})
            .await
            .unwrap();

        assert_eq!(&golden_coefficients(), device.calibration());

        let reading = device.read_measurement().await.unwrap();
        assert_close(25.082477, reading.temperature_celsius(), 1e-5);
        assert_close(100653.27, reading.pressure_pascal().unwrap(), 1e-2);
        assert_close(41.9416, reading.humidity_percent().unwrap(), 1e-4);
    }

    #[tokio::test]
    async fn bme280_skipped_channels() {
        let mut bus = device_bus();
        // pressure and humidity skipped
        bus.with_response::<Data>(&[0x80, 0x00, 0x00, 0x7E, 0xED, 0x00, 0x80, 0x00]);

        let mut device = Bme280::new(bus, Configuration::default(), ResetPolicy::None, &mut FakeDelay {})
            .await
            .unwrap();

        let reading = device.read_measurement().await.unwrap();
        assert_close(25.082477, reading.temperature_celsius(), 1e-5);
        assert_eq!(None, reading.pressure_pascal());
        assert_eq!(None, reading.humidity_percent());
    }

    #[tokio::test]
    async fn bme280_skipped_temperature() {
        let mut bus = device_bus();
        bus.with_response::<Data>(&[0x65, 0x5A, 0xC0, 0x80, 0x00, 0x00, 0x23, 0x28]);

        let mut device = Bme280::new(bus, Configuration::default(), ResetPolicy::None, &mut FakeDelay {})
            .await
            .unwrap();

        assert!(matches!(
            device.read_measurement().await,
            Err(Bme280Error::Compensation(CompensationError::Sequence))
        ));
    }

    #[tokio::test]
    async fn bme280_not_connected() {
        let mut bus: FakeBus<2> = FakeBus::new();
        bus.with_response::<ChipId>(&[0x58]);

        let result = Bme280::new(bus, Configuration::default(), ResetPolicy::None, &mut FakeDelay {}).await;

        assert!(matches!(result, Err(Bme280Error::NotConnected)));
    }

    #[tokio::test]
    async fn bme280_applies_configuration_in_order() {
        let config = Configuration::default()
            .humidity_oversampling(Oversampling::X4)
            .pressure_oversampling(Oversampling::X16)
            .power_mode(PowerMode::Forced);

        let device = Bme280::new(device_bus(), config, ResetPolicy::Soft, &mut FakeDelay {})
            .await
            .unwrap();

        let expected: [(u8, u8); 4] = [
            (0xE0, 0xB6),
            (0xF2, 0b0000_0011),
            (0xF5, 0b1010_0000),
            (0xF4, 0b0011_0101),
        ];
        assert_eq!(&expected[..], device.bus.writes());
    }

    #[tokio::test]
    async fn bme280_reset_timeout() {
        let mut bus = device_bus();
        bus.with_response::<Status>(&[0b0000_0001]);

        let result = Bme280::new(bus, Configuration::default(), ResetPolicy::Soft, &mut FakeDelay {}).await;

        assert!(matches!(result, Err(Bme280Error::Timeout)));
    }

    #[tokio::test]
    async fn bme280_forced_measurement() {
        let mut bus = device_bus();
        bus.with_response::<Data>(&DATA);

        let config = Configuration::default().power_mode(PowerMode::Sleep);
        let mut device = Bme280::new(bus, config, ResetPolicy::None, &mut FakeDelay {})
            .await
            .unwrap();

        let reading = device.measure(&mut FakeDelay {}).await.unwrap();

        assert_close(41.9416, reading.humidity_percent().unwrap(), 1e-4);
        assert_eq!(Some(&(0xF4, 0b0010_0101)), device.bus.writes().last());
        assert_eq!(PowerMode::Sleep, device.configuration().mode());
    }

    #[test]
    fn sdo_pin_address() {
        assert_eq!(0x76, SevenBitAddress::from(SdoPinState::Low));
        assert_eq!(0x77, SevenBitAddress::from(SdoPinState::High));
    }
}
