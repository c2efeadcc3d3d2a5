//! Platform agnostic `no_std` driver for the TSL2561 light-to-digital converter, built on the
//! [`embedded-hal`](https://crates.io/crates/embedded-hal) traits.
//!
//! The driver covers:
//! * power control that always leaves the device in the power state last requested
//! * gain (1x/16x) and integration time (13/101/402 ms or manual) configuration
//! * raw broadband and infrared channel readings
//! * autogain, switching gain once when the broadband channel leaves its window
//! * lux conversion for the standard (T, FN, CL) and CS packages
//! * interrupt threshold window, persistence and clearing
//!
//! ```ignore
//! use tsl2561::{Package, Tsl2561, DEFAULT_ADDRESS};
//!
//! let mut sensor = Tsl2561::new(i2c, delay, DEFAULT_ADDRESS, Package::Standard)?;
//! let lux = sensor.read(true)?;
//! ```
//!
//! Enable the `defmt` feature for logging.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod bus;
mod lux;
pub mod registers;
mod settings;
mod tsl2561;

use core::fmt::{Debug, Display, Formatter};

pub use bus::RegisterBus;
pub use lux::{compute_lux, Breakpoint, LuxError, Package, CS_LUX_TABLE, STANDARD_LUX_TABLE};
pub use settings::{
    Config, Gain, IntegrationTime, InterruptCycles, InvalidGain, InvalidIntegrationTime,
    Threshold,
};
pub use tsl2561::Tsl2561;

/// Address with the ADDR SEL pin tied to ground.
pub const ADDRESS_GND: u8 = 0x29;
/// Address with the ADDR SEL pin left floating.
pub const ADDRESS_FLOAT: u8 = 0x39;
/// Address with the ADDR SEL pin tied to VDD.
pub const ADDRESS_VDD: u8 = 0x49;
pub const DEFAULT_ADDRESS: u8 = ADDRESS_FLOAT;

/// One conversion of both ADC channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// Channel 0, visible and infrared.
    pub broadband: u16,
    /// Channel 1, infrared only.
    pub ir: u16,
}

/// Driver errors. `E` is the error type of the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported an error.
    Bus(E),
    /// The ID register (contained value) does not identify a TSL2561.
    DeviceNotFound(u8),
    /// The timing register (contained value) holds an integration code the driver doesn't know.
    ConfigInconsistent(u8),
    InvalidGain(u8),
    InvalidIntegrationTime(u16),
    /// A channel reached the clip level of the current integration time.
    Saturated,
    ManualIntegrationNoLux,
    ManualIntegrationNoAutogain,
}

impl<E> From<LuxError> for Error<E> {
    fn from(err: LuxError) -> Self {
        match err {
            LuxError::Saturated => Error::Saturated,
            LuxError::ManualIntegration => Error::ManualIntegrationNoLux,
        }
    }
}

impl<E> From<InvalidGain> for Error<E> {
    fn from(err: InvalidGain) -> Self {
        Error::InvalidGain(err.0)
    }
}

impl<E> From<InvalidIntegrationTime> for Error<E> {
    fn from(err: InvalidIntegrationTime) -> Self {
        Error::InvalidIntegrationTime(err.0)
    }
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Error::DeviceNotFound(id) => write!(f, "bad sensor id {id:#x}"),
            Error::ConfigInconsistent(timing) => {
                write!(f, "unknown integration code in timing register {timing:#x}")
            }
            Error::InvalidGain(factor) => Display::fmt(&InvalidGain(*factor), f),
            Error::InvalidIntegrationTime(ms) => Display::fmt(&InvalidIntegrationTime(*ms), f),
            Error::Saturated => Display::fmt(&LuxError::Saturated, f),
            Error::ManualIntegrationNoLux => Display::fmt(&LuxError::ManualIntegration, f),
            Error::ManualIntegrationNoAutogain => {
                f.write_str("can't do autogain with manual integration time")
            }
        }
    }
}

impl<E: Debug> core::error::Error for Error<E> {}
