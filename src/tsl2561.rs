use embedded_hal::delay::DelayNs;

use crate::bus::RegisterBus;
use crate::lux::{compute_lux, LuxError, Package};
use crate::registers::{
    self, Register, CLEAR_BIT, CONTROL_POWER_OFF, CONTROL_POWER_ON, ID_PART_MASK,
};
use crate::settings::{Config, Gain, IntegrationTime, InterruptCycles, Threshold};
use crate::{Error, RawReading};

/// TSL2561 driver.
///
/// The handle caches power state, gain and integration time so queries never touch the bus.
/// Every operation that writes a register or reads fresh channel data powers the device up
/// for its duration and puts it back into the power state last requested via
/// [`set_active`](Self::set_active).
pub struct Tsl2561<I, D> {
    bus: I,
    delay: D,
    address: u8,
    package: Package,
    active: bool,
    gain: Gain,
    integration_time: IntegrationTime,
}

impl<I, D> Tsl2561<I, D>
where
    I: RegisterBus,
    D: DelayNs,
{
    /// Checks the device identity and seeds the cached state from the control and timing
    /// registers.
    pub fn new(
        bus: I,
        delay: D,
        address: u8,
        package: Package,
    ) -> Result<Self, Error<I::Error>> {
        let mut sensor = Tsl2561 {
            bus,
            delay,
            address,
            package,
            active: false,
            gain: Gain::Low,
            integration_time: IntegrationTime::Slow,
        };

        let id = sensor.sensor_id()?;
        if id & ID_PART_MASK == 0 {
            warn!("no TSL2561 at {:#x}, id {:#x}", address, id);
            return Err(Error::DeviceNotFound(id));
        }

        sensor.active = sensor.read8(Register::CONTROL)? != 0;
        let timing = sensor.read8(Register::TIMING)?;
        sensor.gain = Gain::from_timing(timing);
        sensor.integration_time =
            IntegrationTime::from_timing(timing).ok_or(Error::ConfigInconsistent(timing))?;

        info!(
            "TSL2561 id {:#x} at {:#x}: active {}, gain {}x, integration {}ms",
            id,
            address,
            sensor.active,
            sensor.gain.factor(),
            sensor.integration_time.millis()
        );
        Ok(sensor)
    }

    /// Gives back the bus and the delay.
    pub fn release(self) -> (I, D) {
        (self.bus, self.delay)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn package(&self) -> Package {
        self.package
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn integration_time(&self) -> IntegrationTime {
        self.integration_time
    }

    pub fn config(&self) -> Config {
        Config {
            gain: self.gain,
            integration_time: self.integration_time,
        }
    }

    /// Raw ID register: part number in the high nibble, revision in the low nibble.
    pub fn sensor_id(&mut self) -> Result<u8, Error<I::Error>> {
        self.read8(Register::ID)
    }

    /// Powers the device up or down. Does nothing when already in the requested state.
    pub fn set_active(&mut self, active: bool) -> Result<(), Error<I::Error>> {
        if active == self.active {
            return Ok(());
        }
        let control = if active {
            CONTROL_POWER_ON
        } else {
            CONTROL_POWER_OFF
        };
        self.write8(Register::CONTROL, control)?;
        self.active = active;
        trace!("power {}", active);
        Ok(())
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I::Error>> {
        self.configure(Config {
            gain,
            integration_time: self.integration_time,
        })
    }

    /// Sets the gain from its multiplication factor, 1 or 16.
    pub fn set_gain_factor(&mut self, factor: u8) -> Result<(), Error<I::Error>> {
        self.set_gain(Gain::try_from(factor)?)
    }

    pub fn set_integration_time(
        &mut self,
        integration_time: IntegrationTime,
    ) -> Result<(), Error<I::Error>> {
        self.configure(Config {
            gain: self.gain,
            integration_time,
        })
    }

    /// Sets the integration time from milliseconds: 13, 101, 402 or 0 for manual.
    pub fn set_integration_time_ms(&mut self, millis: u16) -> Result<(), Error<I::Error>> {
        self.set_integration_time(IntegrationTime::try_from(millis)?)
    }

    /// Writes gain and integration time in a single timing register update.
    ///
    /// The cached settings follow the timing register as soon as it is written, even when
    /// restoring the power state fails afterwards.
    pub fn configure(&mut self, config: Config) -> Result<(), Error<I::Error>> {
        self.powered(|sensor, _| {
            sensor.write8(Register::TIMING, config.timing_register())?;
            sensor.gain = config.gain;
            sensor.integration_time = config.integration_time;
            Ok(())
        })?;
        debug!(
            "gain {}x, integration {}ms",
            config.gain.factor(),
            config.integration_time.millis()
        );
        Ok(())
    }

    /// Reads both channels once.
    ///
    /// When the device was powered down, this blocks for the settle time of the current
    /// integration time before reading, since the channel registers hold stale data until the
    /// first conversion completes.
    pub fn read_raw(&mut self) -> Result<RawReading, Error<I::Error>> {
        self.powered(|sensor, was_active| {
            if !was_active {
                sensor.delay.delay_ms(sensor.integration_time.settle_ms());
            }
            let broadband = sensor.read16(Register::CHANNEL0)?;
            let ir = sensor.read16(Register::CHANNEL1)?;
            Ok(RawReading { broadband, ir })
        })
    }

    /// Reads both channels, optionally adjusting gain first. See [`read`](Self::read).
    pub fn read_channels(&mut self, autogain: bool) -> Result<RawReading, Error<I::Error>> {
        let reading = self.read_raw()?;
        if !autogain {
            return Ok(reading);
        }

        let (low, high) = self
            .integration_time
            .autogain_window()
            .ok_or(Error::ManualIntegrationNoAutogain)?;
        let gain = if reading.broadband < low {
            Gain::High
        } else if reading.broadband > high {
            Gain::Low
        } else {
            self.gain
        };
        if gain == self.gain {
            return Ok(reading);
        }

        debug!(
            "autogain: broadband {} outside {}..={}, gain {}x",
            reading.broadband,
            low,
            high,
            gain.factor()
        );
        self.set_gain(gain)?;
        self.read_raw()
    }

    /// Reads the illuminance in lux.
    ///
    /// With `autogain`, a broadband reading below the window of the integration time switches
    /// to 16x gain, one above it to 1x, and the channels are read once more. A saturated
    /// second reading is reported, not retried.
    pub fn read(&mut self, autogain: bool) -> Result<f64, Error<I::Error>> {
        let reading = self.read_channels(autogain)?;
        Ok(self.lux(reading)?)
    }

    /// Converts `reading` with the current gain, integration time and package.
    pub fn lux(&self, reading: RawReading) -> Result<f64, LuxError> {
        let lux = compute_lux(
            reading,
            self.gain,
            self.integration_time,
            self.package.lux_table(),
        );
        if matches!(lux, Err(LuxError::Saturated)) {
            warn!(
                "saturated: broadband {}, ir {}",
                reading.broadband, reading.ir
            );
        }
        lux
    }

    /// Reads the interrupt threshold window and persistence.
    pub fn threshold(&mut self) -> Result<Threshold, Error<I::Error>> {
        let low = self.read16(Register::THRESHOLD_LOW)?;
        let high = self.read16(Register::THRESHOLD_HIGH)?;
        let cycles = InterruptCycles::from_register(self.read8(Register::INTERRUPT)?);
        Ok(Threshold { cycles, low, high })
    }

    pub fn set_threshold(&mut self, threshold: Threshold) -> Result<(), Error<I::Error>> {
        self.powered(|sensor, _| {
            sensor.write16(Register::THRESHOLD_LOW, threshold.low)?;
            sensor.write16(Register::THRESHOLD_HIGH, threshold.high)?;
            sensor.write8(Register::INTERRUPT, threshold.cycles.to_register())
        })
    }

    /// Updates the low and/or high bound of the threshold window. `None` leaves that
    /// register untouched.
    pub fn set_threshold_window(
        &mut self,
        low: Option<u16>,
        high: Option<u16>,
    ) -> Result<(), Error<I::Error>> {
        self.powered(|sensor, _| {
            if let Some(low) = low {
                sensor.write16(Register::THRESHOLD_LOW, low)?;
            }
            if let Some(high) = high {
                sensor.write16(Register::THRESHOLD_HIGH, high)?;
            }
            Ok(())
        })
    }

    pub fn set_interrupt_cycles(
        &mut self,
        cycles: InterruptCycles,
    ) -> Result<(), Error<I::Error>> {
        self.powered(|sensor, _| sensor.write8(Register::INTERRUPT, cycles.to_register()))
    }

    /// Clears a pending level interrupt.
    pub fn clear_interrupt(&mut self) -> Result<(), Error<I::Error>> {
        self.bus
            .write8(
                self.address,
                registers::byte(CLEAR_BIT | Register::CONTROL),
                0x00,
            )
            .map_err(Error::Bus)
    }

    /// Runs `op` with the device powered up, then restores the previous power state whether
    /// or not `op` succeeded. `op` gets told whether the device was already active.
    ///
    /// An error from `op` wins over one from the restore.
    fn powered<T>(
        &mut self,
        op: impl FnOnce(&mut Self, bool) -> Result<T, Error<I::Error>>,
    ) -> Result<T, Error<I::Error>> {
        let was_active = self.active;
        self.set_active(true)?;
        let result = op(self, was_active);
        let restored = self.set_active(was_active);
        let value = result?;
        restored?;
        Ok(value)
    }

    fn read8(&mut self, register: u8) -> Result<u8, Error<I::Error>> {
        self.bus
            .read8(self.address, registers::byte(register))
            .map_err(Error::Bus)
    }

    fn write8(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.bus
            .write8(self.address, registers::byte(register), value)
            .map_err(Error::Bus)
    }

    fn read16(&mut self, register: u8) -> Result<u16, Error<I::Error>> {
        self.bus
            .read16(self.address, registers::word(register))
            .map_err(Error::Bus)
    }

    fn write16(&mut self, register: u8, value: u16) -> Result<(), Error<I::Error>> {
        self.bus
            .write16(self.address, registers::word(register), value)
            .map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lux::STANDARD_LUX_TABLE;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x39;

    // Timing register values
    const MEDIUM_LOW: u8 = 0x01;
    const SLOW_HIGH: u8 = 0x12;

    #[derive(Default)]
    struct RecordingDelay {
        waits_ns: Vec<u32>,
    }

    impl RecordingDelay {
        fn total_ms(&self) -> u32 {
            self.waits_ns.iter().sum::<u32>() / 1_000_000
        }
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.waits_ns.push(ns);
        }
    }

    fn init(control: u8, timing: u8) -> Vec<Transaction> {
        vec![
            Transaction::write_read(ADDR, vec![0x8A], vec![0x50]),
            Transaction::write_read(ADDR, vec![0x80], vec![control]),
            Transaction::write_read(ADDR, vec![0x81], vec![timing]),
        ]
    }

    fn power(on: bool) -> Transaction {
        Transaction::write(ADDR, vec![0x80, if on { 0x03 } else { 0x00 }])
    }

    fn timing(value: u8) -> Transaction {
        Transaction::write(ADDR, vec![0x81, value])
    }

    fn channels(broadband: u16, ir: u16) -> Vec<Transaction> {
        vec![
            Transaction::write_read(ADDR, vec![0xAC], broadband.to_le_bytes().to_vec()),
            Transaction::write_read(ADDR, vec![0xAE], ir.to_le_bytes().to_vec()),
        ]
    }

    fn sensor(i2c: &I2cMock, package: Package) -> Tsl2561<I2cMock, RecordingDelay> {
        Tsl2561::new(i2c.clone(), RecordingDelay::default(), ADDR, package).unwrap()
    }

    #[test]
    fn new_seeds_state_from_registers() {
        let mut i2c = I2cMock::new(&init(0x03, SLOW_HIGH));
        let tsl = sensor(&i2c, Package::Standard);

        assert!(tsl.active());
        assert_eq!(tsl.gain(), Gain::High);
        assert_eq!(tsl.integration_time(), IntegrationTime::Slow);
        assert_eq!(tsl.address(), ADDR);

        i2c.done();
    }

    #[test]
    fn new_rejects_unknown_id() {
        let mut i2c = I2cMock::new(&[Transaction::write_read(ADDR, vec![0x8A], vec![0x0A])]);

        let result = Tsl2561::new(i2c.clone(), RecordingDelay::default(), ADDR, Package::Cs);
        assert!(matches!(result, Err(Error::DeviceNotFound(0x0A))));

        i2c.done();
    }

    #[test]
    fn new_reports_unlisted_integration_code() {
        let mut i2c = I2cMock::new(&init(0x00, 0x0B));

        let result = Tsl2561::new(
            i2c.clone(),
            RecordingDelay::default(),
            ADDR,
            Package::Standard,
        );
        assert!(matches!(result, Err(Error::ConfigInconsistent(0x0B))));

        i2c.done();
    }

    #[test]
    fn new_propagates_bus_error() {
        let mut i2c = I2cMock::new(&[
            Transaction::write_read(ADDR, vec![0x8A], vec![0x00]).with_error(ErrorKind::Other)
        ]);

        let result = Tsl2561::new(
            i2c.clone(),
            RecordingDelay::default(),
            ADDR,
            Package::Standard,
        );
        assert!(matches!(result, Err(Error::Bus(ErrorKind::Other))));

        i2c.done();
    }

    #[test]
    fn set_active_only_writes_on_change() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.push(power(true));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.set_active(false).unwrap();
        tsl.set_active(true).unwrap();
        tsl.set_active(true).unwrap();
        assert!(tsl.active());

        i2c.done();
    }

    #[test]
    fn set_gain_powers_up_and_restores() {
        let mut expectations = init(0x00, 0x02);
        expectations.extend([power(true), timing(SLOW_HIGH), power(false)]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.set_gain(Gain::High).unwrap();
        assert_eq!(tsl.gain(), Gain::High);
        assert!(!tsl.active());

        i2c.done();
    }

    #[test]
    fn integration_time_round_trip() {
        let mut expectations = init(0x03, 0x10);
        expectations.extend([timing(0x11), timing(0x12), timing(0x10), timing(0x13)]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        for mode in [
            IntegrationTime::Medium,
            IntegrationTime::Slow,
            IntegrationTime::Fast,
            IntegrationTime::Manual,
        ] {
            tsl.set_integration_time(mode).unwrap();
            assert_eq!(tsl.integration_time(), mode);
            assert_eq!(tsl.gain(), Gain::High);
        }
        assert!(tsl.active());

        i2c.done();
    }

    #[test]
    fn invalid_settings_touch_nothing() {
        let mut i2c = I2cMock::new(&init(0x00, MEDIUM_LOW));
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.set_gain_factor(4), Err(Error::InvalidGain(4)));
        assert_eq!(
            tsl.set_integration_time_ms(50),
            Err(Error::InvalidIntegrationTime(50))
        );
        assert_eq!(tsl.gain(), Gain::Low);
        assert_eq!(tsl.integration_time(), IntegrationTime::Medium);

        i2c.done();
    }

    #[test]
    fn set_gain_factor_and_millis() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend([timing(0x11), timing(0x10)]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.set_gain_factor(16).unwrap();
        tsl.set_integration_time_ms(13).unwrap();
        assert_eq!(
            tsl.config(),
            Config {
                gain: Gain::High,
                integration_time: IntegrationTime::Fast,
            }
        );

        i2c.done();
    }

    #[test]
    fn failed_write_still_restores_power() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.extend([
            power(true),
            timing(0x11).with_error(ErrorKind::Other),
            power(false),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.set_gain(Gain::High), Err(Error::Bus(ErrorKind::Other)));
        assert!(!tsl.active());
        assert_eq!(tsl.gain(), Gain::Low);

        i2c.done();
    }

    #[test]
    fn failed_power_down_keeps_written_gain() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.extend([
            power(true),
            timing(0x11),
            power(false).with_error(ErrorKind::Other),
        ]);
        expectations.extend(channels(5000, 2000));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.set_gain(Gain::High), Err(Error::Bus(ErrorKind::Other)));
        assert_eq!(tsl.gain(), Gain::High);
        assert!(tsl.active());

        // Still powered, so no settle wait and no power writes; lux uses the 16x scale.
        let lux = tsl.read(false).unwrap();
        let expected = compute_lux(
            RawReading {
                broadband: 5000,
                ir: 2000,
            },
            Gain::High,
            IntegrationTime::Medium,
            &STANDARD_LUX_TABLE,
        )
        .unwrap();
        assert_eq!(lux, expected);

        i2c.done();
    }

    #[test]
    fn threshold_window_partial_update() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend([
            Transaction::write(ADDR, vec![0xA2, 0x20, 0x00]),
            Transaction::write(ADDR, vec![0xA4, 0x00, 0x90]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.set_threshold_window(Some(0x0020), None).unwrap();
        tsl.set_threshold_window(None, Some(0x9000)).unwrap();
        tsl.set_threshold_window(None, None).unwrap();

        i2c.done();
    }

    #[test]
    fn read_from_inactive_waits_and_powers_down() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.push(power(true));
        expectations.extend(channels(5000, 2000));
        expectations.push(power(false));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        let lux = tsl.read(false).unwrap();
        assert!((lux - 261.591947555542).abs() < 1e-9);
        assert!(!tsl.active());

        let (_, delay) = tsl.release();
        assert_eq!(delay.total_ms(), 120);
        i2c.done();
    }

    #[test]
    fn read_while_active_skips_settle_wait() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend(channels(5000, 2000));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Cs);

        let lux = tsl.read(false).unwrap();
        assert!((lux - 298.4748249053955).abs() < 1e-9);
        assert!(tsl.active());

        let (_, delay) = tsl.release();
        assert!(delay.waits_ns.is_empty());
        i2c.done();
    }

    #[test]
    fn read_raw_failure_restores_power() {
        let mut expectations = init(0x00, 0x00);
        expectations.extend([
            power(true),
            Transaction::write_read(ADDR, vec![0xAC], vec![0, 0]).with_error(ErrorKind::Other),
            power(false),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.read_raw(), Err(Error::Bus(ErrorKind::Other)));
        assert!(!tsl.active());

        let (_, delay) = tsl.release();
        assert_eq!(delay.total_ms(), 15);
        i2c.done();
    }

    #[test]
    fn autogain_raises_gain_on_dim_light() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend(channels(150, 20));
        expectations.push(timing(0x11));
        expectations.extend(channels(2400, 300));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        let lux = tsl.read(true).unwrap();
        assert_eq!(tsl.gain(), Gain::High);
        let expected = compute_lux(
            RawReading {
                broadband: 2400,
                ir: 300,
            },
            Gain::High,
            IntegrationTime::Medium,
            &STANDARD_LUX_TABLE,
        )
        .unwrap();
        assert_eq!(lux, expected);

        i2c.done();
    }

    #[test]
    fn autogain_lowers_gain_and_retries_once() {
        let mut expectations = init(0x00, SLOW_HIGH);
        expectations.push(power(true));
        expectations.extend(channels(64000, 1000));
        expectations.push(power(false));
        expectations.extend([power(true), timing(0x02), power(false)]);
        expectations.push(power(true));
        expectations.extend(channels(64500, 900));
        expectations.push(power(false));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        let reading = tsl.read_channels(true).unwrap();
        assert_eq!(
            reading,
            RawReading {
                broadband: 64500,
                ir: 900
            }
        );
        assert_eq!(tsl.gain(), Gain::Low);
        assert!(!tsl.active());

        let (_, delay) = tsl.release();
        assert_eq!(delay.total_ms(), 900);
        i2c.done();
    }

    #[test]
    fn autogain_keeps_gain_inside_window() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend(channels(200, 50));
        expectations.extend(channels(36000, 50));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.read_channels(true).unwrap();
        tsl.read_channels(true).unwrap();
        assert_eq!(tsl.gain(), Gain::Low);

        i2c.done();
    }

    #[test]
    fn manual_integration_refuses_autogain_and_lux() {
        let mut expectations = init(0x03, 0x03);
        expectations.extend(channels(1000, 100));
        expectations.extend(channels(1000, 100));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.read(true), Err(Error::ManualIntegrationNoAutogain));
        assert_eq!(tsl.read(false), Err(Error::ManualIntegrationNoLux));

        i2c.done();
    }

    #[test]
    fn saturated_reading_is_reported() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.extend(channels(37000, 100));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(tsl.read(false), Err(Error::Saturated));

        i2c.done();
    }

    #[test]
    fn threshold_read_back() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.extend([
            Transaction::write_read(ADDR, vec![0xA2], vec![0x10, 0x00]),
            Transaction::write_read(ADDR, vec![0xA4], vec![0x00, 0x20]),
            Transaction::write_read(ADDR, vec![0x86], vec![0x14]),
            Transaction::write_read(ADDR, vec![0xA2], vec![0x00, 0x00]),
            Transaction::write_read(ADDR, vec![0xA4], vec![0xFF, 0xFF]),
            Transaction::write_read(ADDR, vec![0x86], vec![0x04]),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        assert_eq!(
            tsl.threshold().unwrap(),
            Threshold {
                cycles: InterruptCycles::Persist(4),
                low: 0x0010,
                high: 0x2000,
            }
        );
        assert_eq!(
            tsl.threshold().unwrap(),
            Threshold {
                cycles: InterruptCycles::Disabled,
                low: 0,
                high: 0xFFFF,
            }
        );

        i2c.done();
    }

    #[test]
    fn threshold_writes_are_powered_and_clamped() {
        let mut expectations = init(0x00, MEDIUM_LOW);
        expectations.extend([
            power(true),
            Transaction::write(ADDR, vec![0xA2, 0x34, 0x12]),
            Transaction::write(ADDR, vec![0xA4, 0x78, 0x56]),
            Transaction::write(ADDR, vec![0x86, 0x1F]),
            power(false),
            power(true),
            Transaction::write(ADDR, vec![0x86, 0x00]),
            power(false),
            power(true),
            Transaction::write(ADDR, vec![0xA2, 0x00, 0x01]),
            Transaction::write(ADDR, vec![0xA4, 0x00, 0x02]),
            power(false),
        ]);
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.set_threshold(Threshold {
            cycles: InterruptCycles::Persist(42),
            low: 0x1234,
            high: 0x5678,
        })
        .unwrap();
        tsl.set_interrupt_cycles(InterruptCycles::from_count(-1))
            .unwrap();
        tsl.set_threshold_window(Some(0x0100), Some(0x0200)).unwrap();
        assert!(!tsl.active());

        i2c.done();
    }

    #[test]
    fn clear_interrupt_sets_clear_bit() {
        let mut expectations = init(0x03, MEDIUM_LOW);
        expectations.push(Transaction::write(ADDR, vec![0xC0, 0x00]));
        let mut i2c = I2cMock::new(&expectations);
        let mut tsl = sensor(&i2c, Package::Standard);

        tsl.clear_interrupt().unwrap();

        i2c.done();
    }
}
