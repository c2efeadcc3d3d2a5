//! Register map and framing bits of the TSL2561.
//!
//! Every register access goes through the command register: the register index lives in the
//! low nibble and the high nibble carries the framing bits.

/// Marks the byte as a command. Must be set on every access.
pub const COMMAND_BIT: u8 = 0x80;
/// Clears a pending interrupt.
pub const CLEAR_BIT: u8 = 0x40;
/// Selects SMBus word access (two consecutive registers, low byte first).
pub const WORD_BIT: u8 = 0x20;

pub(crate) struct Register;

impl Register {
    pub const CONTROL: u8 = 0x00;
    pub const TIMING: u8 = 0x01;
    pub const THRESHOLD_LOW: u8 = 0x02;
    pub const THRESHOLD_HIGH: u8 = 0x04;
    pub const INTERRUPT: u8 = 0x06;
    pub const ID: u8 = 0x0A;
    pub const CHANNEL0: u8 = 0x0C;
    pub const CHANNEL1: u8 = 0x0E;
}

pub(crate) const CONTROL_POWER_ON: u8 = 0x03;
pub(crate) const CONTROL_POWER_OFF: u8 = 0x00;

/// Bit of the ID register every TSL2561 part number has set.
pub(crate) const ID_PART_MASK: u8 = 0x10;

pub(crate) const INTERRUPT_NONE: u8 = 0x00;
pub(crate) const INTERRUPT_LEVEL: u8 = 0x10;
pub(crate) const INTERRUPT_PERSIST_MASK: u8 = 0x0F;

/// Gain bit of the timing register.
pub(crate) const TIMING_GAIN_MASK: u8 = 0xF0;
/// Integration field of the timing register.
pub(crate) const TIMING_INTEG_MASK: u8 = 0x0F;

/// Command byte for an 8-bit access to `register`.
pub(crate) const fn byte(register: u8) -> u8 {
    COMMAND_BIT | register
}

/// Command byte for a 16-bit access starting at `register`.
pub(crate) const fn word(register: u8) -> u8 {
    COMMAND_BIT | WORD_BIT | register
}
