//! ES8156 register map and power sequences
//!
//! Source: Everest Semiconductor ES8156 datasheet and Espressif's reference
//! bring-up sequence.
//!
//! # Key I²C Constraints
//!
//! ## 8-bit vs 7-bit address
//! The datasheet quotes the address in 8-bit write form (`0x10` with AD0 low).
//! `embedded-hal` takes the 7-bit form, `0x08`.
//!
//! ## Single-byte register access
//! Every register is one byte wide and addressed by a one-byte index. A read
//! is a `write_read` of exactly one index byte and one data byte.

use codec_platform::{VolMapPoint, VolRange};

/// Default address in the datasheet's 8-bit form (AD0 = 0).
pub const DEFAULT_ADDR_8BIT: u8 = 0x10;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Reset / chip state control
pub const REG_RESET: u8 = 0x00;

/// SCLK mode and master/slave selection
pub const REG_SCLK_MODE: u8 = 0x02;

/// Clock gating - 0x3F enables all internal clocks
pub const REG_CLOCK_ON_OFF: u8 = 0x08;

/// Misc control 2 - soft power-down bits
pub const REG_MISC_CONTROL2: u8 = 0x09;

/// Time control 1 (power-up timing)
pub const REG_TIME_CONTROL1: u8 = 0x0A;

/// Time control 2 (power-up timing)
pub const REG_TIME_CONTROL2: u8 = 0x0B;

/// Parallel-to-serial control
pub const REG_P2S_CONTROL: u8 = 0x0D;

/// Serial data port format
pub const REG_DAC_SDP: u8 = 0x11;

/// DAC mute - bits 1 and 2 mute left and right
pub const REG_DAC_MUTE: u8 = 0x13;

/// Digital volume: 0x00 = -95.5 dB … 0xFF = +32 dB, 0.5 dB steps
pub const REG_VOLUME_CONTROL: u8 = 0x14;

/// Misc control 3
pub const REG_MISC_CONTROL3: u8 = 0x18;

/// EQ control 1 (also gates the DAC digital path)
pub const REG_EQ_CONTROL1: u8 = 0x19;

/// Analog system 1
pub const REG_ANALOG_SYS1: u8 = 0x20;

/// Analog system 2 - output stage bias
pub const REG_ANALOG_SYS2: u8 = 0x21;

/// Analog system 3 - output stage enable
pub const REG_ANALOG_SYS3: u8 = 0x22;

/// Analog system 4
pub const REG_ANALOG_SYS4: u8 = 0x23;

/// Analog system 5
pub const REG_ANALOG_SYS5: u8 = 0x24;

/// Analog system 6 - analog power-down
pub const REG_ANALOG_SYS6: u8 = 0x25;

// ---------------------------------------------------------------------------
// Bit fields / values
// ---------------------------------------------------------------------------

/// Left and right DAC mute bits of [`REG_DAC_MUTE`]
pub const DAC_MUTE_MASK: u8 = (1 << 1) | (1 << 2);

/// Power-up volume register value (about -6 dB)
pub const VOLUME_DEFAULT: u8 = 179;

/// Digital volume range of [`REG_VOLUME_CONTROL`]
pub const VOL_RANGE: VolRange = VolRange::new(VolMapPoint::new(0x00, -95.5), VolMapPoint::new(0xFF, 32.0));

// ---------------------------------------------------------------------------
// Sequences - (register, value), written in order
// ---------------------------------------------------------------------------

/// Bring-up after power-on, slave mode.
pub const OPEN_SEQUENCE: &[(u8, u8)] = &[
    (REG_SCLK_MODE, 0x04),
    (REG_ANALOG_SYS1, 0x2A),
    (REG_ANALOG_SYS2, 0x3C),
    (REG_ANALOG_SYS3, 0x00),
    (REG_ANALOG_SYS5, 0x07),
    (REG_ANALOG_SYS4, 0x00),
    (REG_TIME_CONTROL1, 0x01),
    (REG_TIME_CONTROL2, 0x01),
    (REG_DAC_SDP, 0x00),
    (REG_VOLUME_CONTROL, VOLUME_DEFAULT),
    (REG_P2S_CONTROL, 0x14),
    (REG_MISC_CONTROL3, 0x00),
    (REG_CLOCK_ON_OFF, 0x3F),
    (REG_RESET, 0x02),
    (REG_RESET, 0x03),
    (REG_ANALOG_SYS6, 0x20),
];

/// Start converters; restores [`VOLUME_DEFAULT`].
pub const START_SEQUENCE: &[(u8, u8)] = &[
    (REG_CLOCK_ON_OFF, 0x3F),
    (REG_MISC_CONTROL2, 0x00),
    (REG_MISC_CONTROL3, 0x00),
    (REG_ANALOG_SYS6, 0x20),
    (REG_ANALOG_SYS3, 0x00),
    (REG_ANALOG_SYS2, 0x3C),
    (REG_EQ_CONTROL1, 0x20),
    (REG_VOLUME_CONTROL, VOLUME_DEFAULT),
];

/// Stop converters and power down the analog stage.
pub const STOP_SEQUENCE: &[(u8, u8)] = &[
    (REG_VOLUME_CONTROL, 0x00),
    (REG_EQ_CONTROL1, 0x02),
    (REG_ANALOG_SYS2, 0x1F),
    (REG_ANALOG_SYS3, 0x02),
    (REG_ANALOG_SYS6, 0x21),
    (REG_ANALOG_SYS6, 0xA1),
    (REG_MISC_CONTROL3, 0x01),
    (REG_MISC_CONTROL2, 0x02),
    (REG_MISC_CONTROL2, 0x01),
    (REG_CLOCK_ON_OFF, 0x00),
];
