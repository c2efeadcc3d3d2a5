use core::fmt;

use crate::registers::{
    INTERRUPT_LEVEL, INTERRUPT_NONE, INTERRUPT_PERSIST_MASK, TIMING_GAIN_MASK, TIMING_INTEG_MASK,
};

/// Amplifier gain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 1x
    #[default]
    Low,
    /// 16x
    High,
}

impl Gain {
    pub const fn factor(self) -> u8 {
        match self {
            Gain::Low => 1,
            Gain::High => 16,
        }
    }

    pub(crate) const fn timing_bit(self) -> u8 {
        match self {
            Gain::Low => 0x00,
            Gain::High => 0x10,
        }
    }

    pub(crate) const fn from_timing(timing: u8) -> Self {
        if timing & TIMING_GAIN_MASK == 0 {
            Gain::Low
        } else {
            Gain::High
        }
    }
}

/// Returned when a gain factor other than 1 or 16 is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidGain(pub u8);

impl fmt::Display for InvalidGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gain must be either 1x or 16x, got {}x", self.0)
    }
}

impl core::error::Error for InvalidGain {}

impl TryFrom<u8> for Gain {
    type Error = InvalidGain;

    fn try_from(factor: u8) -> Result<Self, Self::Error> {
        match factor {
            1 => Ok(Gain::Low),
            16 => Ok(Gain::High),
            other => Err(InvalidGain(other)),
        }
    }
}

/// Per-mode constants of a timed integration.
struct Timing {
    settle_ms: u32,
    clip: u16,
    autogain_low: u16,
    autogain_high: u16,
    scale: u32,
}

const FAST: Timing = Timing {
    settle_ms: 15,
    clip: 4900,
    autogain_low: 100,
    autogain_high: 4850,
    scale: 0x7517,
};

const MEDIUM: Timing = Timing {
    settle_ms: 120,
    clip: 37000,
    autogain_low: 200,
    autogain_high: 36000,
    scale: 0x0FE7,
};

const SLOW: Timing = Timing {
    settle_ms: 450,
    clip: 65000,
    autogain_low: 500,
    autogain_high: 63000,
    scale: 1 << 10,
};

/// How long the ADCs integrate before a conversion completes.
///
/// `Manual` leaves integration under control of the manual start/stop bit. It is a valid
/// configuration, but no clip level or scale is known for it, so neither lux conversion nor
/// autogain is possible in that mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntegrationTime {
    /// 13.7 ms
    Fast,
    /// 101 ms
    Medium,
    /// 402 ms
    #[default]
    Slow,
    Manual,
}

impl IntegrationTime {
    /// Nominal integration time in milliseconds, 0 for `Manual`.
    pub const fn millis(self) -> u16 {
        match self {
            IntegrationTime::Fast => 13,
            IntegrationTime::Medium => 101,
            IntegrationTime::Slow => 402,
            IntegrationTime::Manual => 0,
        }
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            IntegrationTime::Fast => 0x00,
            IntegrationTime::Medium => 0x01,
            IntegrationTime::Slow => 0x02,
            IntegrationTime::Manual => 0x03,
        }
    }

    /// Reverse lookup of the integration field of the timing register.
    pub(crate) const fn from_timing(timing: u8) -> Option<Self> {
        match timing & TIMING_INTEG_MASK {
            0x00 => Some(IntegrationTime::Fast),
            0x01 => Some(IntegrationTime::Medium),
            0x02 => Some(IntegrationTime::Slow),
            0x03 => Some(IntegrationTime::Manual),
            _ => None,
        }
    }

    const fn timing(self) -> Option<&'static Timing> {
        match self {
            IntegrationTime::Fast => Some(&FAST),
            IntegrationTime::Medium => Some(&MEDIUM),
            IntegrationTime::Slow => Some(&SLOW),
            IntegrationTime::Manual => None,
        }
    }

    /// Time to wait after power-on before the channel registers hold a valid conversion.
    pub const fn settle_ms(self) -> u32 {
        match self.timing() {
            Some(t) => t.settle_ms,
            None => 0,
        }
    }

    /// Channel value at and above which a reading counts as saturated.
    pub const fn clip(self) -> Option<u16> {
        match self.timing() {
            Some(t) => Some(t.clip),
            None => None,
        }
    }

    /// Broadband window `(low, high)` outside of which autogain switches gain.
    pub const fn autogain_window(self) -> Option<(u16, u16)> {
        match self.timing() {
            Some(t) => Some((t.autogain_low, t.autogain_high)),
            None => None,
        }
    }

    /// Channel scale constant for 1x gain, in 2^10 fixed point.
    pub const fn scale(self) -> Option<u32> {
        match self.timing() {
            Some(t) => Some(t.scale),
            None => None,
        }
    }
}

/// Returned when an integration time other than 0, 13, 101 or 402 ms is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidIntegrationTime(pub u16);

impl fmt::Display for InvalidIntegrationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "integration time must be 0, 13ms, 101ms or 402ms, got {}ms",
            self.0
        )
    }
}

impl core::error::Error for InvalidIntegrationTime {}

impl TryFrom<u16> for IntegrationTime {
    type Error = InvalidIntegrationTime;

    fn try_from(millis: u16) -> Result<Self, Self::Error> {
        match millis {
            0 => Ok(IntegrationTime::Manual),
            13 => Ok(IntegrationTime::Fast),
            101 => Ok(IntegrationTime::Medium),
            402 => Ok(IntegrationTime::Slow),
            other => Err(InvalidIntegrationTime(other)),
        }
    }
}

/// Gain and integration time, written together into the timing register.
///
/// The default matches the chip's power-on state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub gain: Gain,
    pub integration_time: IntegrationTime,
}

impl Config {
    pub(crate) const fn timing_register(&self) -> u8 {
        self.integration_time.code() | self.gain.timing_bit()
    }
}

/// Number of consecutive out-of-window conversions before the interrupt fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptCycles {
    Disabled,
    /// 0 fires on every conversion, 1 on any value outside the window, `n` after `n`
    /// integration periods. Values above 15 are clamped when written.
    Persist(u8),
}

impl InterruptCycles {
    /// `-1` disables the interrupt, anything else is clamped into `0..=15`.
    pub fn from_count(count: i32) -> Self {
        if count == -1 {
            InterruptCycles::Disabled
        } else {
            InterruptCycles::Persist(count.clamp(0, 15) as u8)
        }
    }

    pub(crate) fn to_register(self) -> u8 {
        match self {
            InterruptCycles::Disabled => INTERRUPT_NONE,
            InterruptCycles::Persist(n) => n.min(15) | INTERRUPT_LEVEL,
        }
    }

    pub(crate) fn from_register(value: u8) -> Self {
        if value & INTERRUPT_LEVEL == 0 {
            InterruptCycles::Disabled
        } else {
            InterruptCycles::Persist(value & INTERRUPT_PERSIST_MASK)
        }
    }
}

/// Interrupt threshold window on channel 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Threshold {
    pub cycles: InterruptCycles,
    pub low: u16,
    pub high: u16,
}
