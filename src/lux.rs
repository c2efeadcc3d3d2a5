//! Conversion of raw channel counts into illuminance.
//!
//! The piecewise approximation comes from the TSL2561 datasheet. Each breakpoint gives the
//! coefficients `b` and `m` of `lux = channel0 * b - channel1 * m` for IR/broadband ratios up
//! to its threshold. The coefficients are in 2^14 fixed point, the ratio in 2^9.

use core::fmt;

use crate::settings::{Gain, IntegrationTime};
use crate::RawReading;

/// One segment of the lux approximation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    pub ratio: u16,
    pub b: u16,
    pub m: u16,
}

const fn bp(ratio: u16, b: u16, m: u16) -> Breakpoint {
    Breakpoint { ratio, b, m }
}

/// T, FN and CL packages.
pub static STANDARD_LUX_TABLE: [Breakpoint; 7] = [
    bp(0x0040, 0x01f2, 0x01be),
    bp(0x0080, 0x0214, 0x02d1),
    bp(0x00c0, 0x023f, 0x037b),
    bp(0x0100, 0x0270, 0x03fe),
    bp(0x0138, 0x016f, 0x01fc),
    bp(0x019a, 0x00d2, 0x00fb),
    bp(0x029a, 0x0018, 0x0012),
];

/// CS (chipscale) package.
pub static CS_LUX_TABLE: [Breakpoint; 7] = [
    bp(0x0043, 0x0204, 0x01ad),
    bp(0x0085, 0x0228, 0x02c1),
    bp(0x00c8, 0x0253, 0x0363),
    bp(0x010a, 0x0282, 0x03df),
    bp(0x014d, 0x0177, 0x01dd),
    bp(0x019a, 0x0101, 0x0127),
    bp(0x029a, 0x0037, 0x002b),
];

/// Physical package of the sensor. Packages only differ in their lux calibration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Package {
    /// TSL2561T, TSL2561FN and TSL2561CL
    #[default]
    Standard,
    /// TSL2561CS
    Cs,
}

impl Package {
    pub fn lux_table(self) -> &'static [Breakpoint] {
        match self {
            Package::Standard => &STANDARD_LUX_TABLE,
            Package::Cs => &CS_LUX_TABLE,
        }
    }
}

/// Reasons a reading cannot be converted to lux.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LuxError {
    /// A channel reached the clip level of the integration time.
    Saturated,
    /// Manual integration has no known scale.
    ManualIntegration,
}

impl fmt::Display for LuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuxError::Saturated => f.write_str("sensor saturated"),
            LuxError::ManualIntegration => {
                f.write_str("can't calculate lux with manual integration time")
            }
        }
    }
}

impl core::error::Error for LuxError {}

/// Computes the illuminance in lux for `reading` taken with the given settings.
pub fn compute_lux(
    reading: RawReading,
    gain: Gain,
    integration_time: IntegrationTime,
    table: &[Breakpoint],
) -> Result<f64, LuxError> {
    let (Some(clip), Some(scale)) = (integration_time.clip(), integration_time.scale()) else {
        return Err(LuxError::ManualIntegration);
    };
    if reading.broadband >= clip || reading.ir >= clip {
        return Err(LuxError::Saturated);
    }

    let scale = f64::from(scale) / f64::from(gain.factor());
    let channel0 = f64::from(reading.broadband) * scale / 1024.0;
    let channel1 = f64::from(reading.ir) * scale / 1024.0;

    let ratio = if channel0 != 0.0 {
        channel1 * 1024.0 / channel0
    } else {
        0.0
    };
    let ratio = (ratio + 1.0) / 2.0;

    let (b, m) = table
        .iter()
        .find(|point| f64::from(point.ratio) >= ratio)
        .map_or((0.0, 0.0), |point| (f64::from(point.b), f64::from(point.m)));

    let lux = (channel0 * b - channel1 * m).max(0.0);
    Ok((lux + 8192.0) / 16384.0)
}
