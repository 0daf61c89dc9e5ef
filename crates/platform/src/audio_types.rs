//! Audio domain types shared by sessions and drivers.
//!
//! - `SampleInfo`: negotiated PCM format (bits, channels, rate)
//! - `DeviceType`: direction capability of a logical device
//! - `I2cAddr`: 7-bit control-bus address with reserved-range checking

use crate::error::CodecError;

// ── SampleInfo ───────────────────────────────────────────────────────────────

/// PCM sample format negotiated when a device is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleInfo {
    /// Bits per sample of one channel (16, 24 or 32)
    pub bits_per_sample: u8,
    /// Number of interleaved channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl SampleInfo {
    /// Create a sample format.
    pub const fn new(bits_per_sample: u8, channels: u8, sample_rate: u32) -> Self {
        Self {
            bits_per_sample,
            channels,
            sample_rate,
        }
    }

    /// Bytes occupied by one interleaved frame (all channels of one sample).
    pub fn frame_bytes(&self) -> usize {
        usize::from(self.bits_per_sample / 8).saturating_mul(usize::from(self.channels))
    }

    /// Reject formats that cannot describe a PCM stream.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] if any field is zero or the bit depth is not
    /// a whole number of bytes.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.sample_rate == 0
            || self.channels == 0
            || self.bits_per_sample == 0
            || self.bits_per_sample % 8 != 0
        {
            return Err(CodecError::InvalidArg);
        }
        Ok(())
    }
}

impl Default for SampleInfo {
    fn default() -> Self {
        Self {
            bits_per_sample: 16,
            channels: 2,
            sample_rate: 48_000,
        }
    }
}

// ── DeviceType ───────────────────────────────────────────────────────────────

/// Direction capability of a codec device: input, output, or both.
///
/// Immutable once a session is created. [`DeviceType::NONE`] exists only so
/// that constructors can reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceType(u8);

impl DeviceType {
    /// No direction; never a valid device.
    pub const NONE: Self = Self(0);
    /// Input device such as a microphone.
    pub const IN: Self = Self(1 << 0);
    /// Output device such as a speaker.
    pub const OUT: Self = Self(1 << 1);
    /// Device with both input and output paths.
    pub const IN_OUT: Self = Self(Self::IN.0 | Self::OUT.0);

    /// `true` for [`DeviceType::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// `true` if the device can record.
    pub const fn has_input(self) -> bool {
        self.0 & Self::IN.0 != 0
    }

    /// `true` if the device can play back.
    pub const fn has_output(self) -> bool {
        self.0 & Self::OUT.0 != 0
    }

    /// Raw bitmask (bit 0 = input, bit 1 = output).
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl core::ops::BitOr for DeviceType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ── I2cAddr ──────────────────────────────────────────────────────────────────

/// 7-bit I2C address of a codec control port.
///
/// ## Reserved I2C addresses (I2C specification):
/// - 0x00–0x07: reserved (general call, CBUS, etc.)
/// - 0x78–0x7F: reserved (10-bit address prefix, device ID, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddr(u8);

impl I2cAddr {
    /// Create an address without checking reserved ranges.
    ///
    /// Use for hardware-fixed constants only.
    pub const fn new(addr: u8) -> Self {
        Self(addr)
    }

    /// Create an address from the 8-bit "write" form used by many codec
    /// datasheets (address shifted left, R/W bit clear).
    pub const fn from_8bit(addr: u8) -> Self {
        Self(addr >> 1)
    }

    /// Create an address, rejecting I2C-reserved ranges.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] if `addr <= 0x07` or `addr >= 0x78`.
    pub fn try_new(addr: u8) -> Result<Self, CodecError> {
        if addr <= 0x07 || addr >= 0x78 {
            Err(CodecError::InvalidArg)
        } else {
            Ok(Self(addr))
        }
    }

    /// Return the 7-bit address.
    pub const fn get(self) -> u8 {
        self.0
    }
}
