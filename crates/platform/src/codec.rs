//! Hardware codec abstraction
//!
//! Codec chips differ in what they can do: some have hardware volume, some
//! only a mute bit, ADC-only parts have no DAC controls at all. A driver
//! advertises what it implements through [`AudioCodec::capabilities`];
//! every optional operation has a default body returning
//! [`CodecError::NotSupported`].

use crate::audio_types::SampleInfo;
use crate::error::CodecError;

/// Set of optional operations implemented by an [`AudioCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecCaps(u16);

impl CodecCaps {
    /// [`AudioCodec::enable`]
    pub const ENABLE: Self = Self(1 << 0);
    /// [`AudioCodec::set_format`]
    pub const SET_FORMAT: Self = Self(1 << 1);
    /// [`AudioCodec::mute`]
    pub const MUTE: Self = Self(1 << 2);
    /// [`AudioCodec::set_volume_db`]
    pub const VOLUME: Self = Self(1 << 3);
    /// [`AudioCodec::set_mic_gain_db`]
    pub const MIC_GAIN: Self = Self(1 << 4);
    /// [`AudioCodec::mute_mic`]
    pub const MIC_MUTE: Self = Self(1 << 5);
    /// [`AudioCodec::write_register`] and [`AudioCodec::read_register`]
    pub const REGISTER: Self = Self(1 << 6);

    /// No optional operation.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every optional operation.
    pub const fn all() -> Self {
        Self(0x7F)
    }

    /// `true` if every flag in `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags present in either set.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `self` with the flags of `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl core::ops::BitOr for CodecCaps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Audio codec chip driver (register control side).
///
/// The PCM stream does not go through this trait; see [`crate::DataPath`].
/// Operations are synchronous and run on the caller's thread.
pub trait AudioCodec {
    /// Driver-specific configuration passed to [`AudioCodec::open`].
    type Config;

    /// Optional operations this driver implements.
    fn capabilities(&self) -> CodecCaps;

    /// Bring the chip up (reset, default registers, PA power).
    fn open(&mut self, config: &Self::Config) -> Result<(), CodecError>;

    /// Whether [`AudioCodec::open`] has succeeded and `close` not been called.
    fn is_open(&self) -> bool {
        true
    }

    /// Start (`true`) or stop (`false`) the converters.
    fn enable(&mut self, _enable: bool) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Configure the chip for a sample format.
    fn set_format(&mut self, _info: &SampleInfo) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Mute or un-mute the DAC output.
    fn mute(&mut self, _mute: bool) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Set DAC volume in decibels.
    fn set_volume_db(&mut self, _db: f32) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Set microphone (ADC) gain in decibels.
    fn set_mic_gain_db(&mut self, _db: f32) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Mute or un-mute the microphone input.
    fn mute_mic(&mut self, _mute: bool) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Write a raw chip register.
    fn write_register(&mut self, _reg: u16, _value: u16) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Read a raw chip register.
    fn read_register(&mut self, _reg: u16) -> Result<u16, CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Power the chip down.
    fn close(&mut self) -> Result<(), CodecError> {
        Ok(())
    }
}

impl<T: AudioCodec + ?Sized> AudioCodec for &mut T {
    type Config = T::Config;

    fn capabilities(&self) -> CodecCaps {
        T::capabilities(self)
    }

    fn open(&mut self, config: &Self::Config) -> Result<(), CodecError> {
        T::open(self, config)
    }

    fn is_open(&self) -> bool {
        T::is_open(self)
    }

    fn enable(&mut self, enable: bool) -> Result<(), CodecError> {
        T::enable(self, enable)
    }

    fn set_format(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        T::set_format(self, info)
    }

    fn mute(&mut self, mute: bool) -> Result<(), CodecError> {
        T::mute(self, mute)
    }

    fn set_volume_db(&mut self, db: f32) -> Result<(), CodecError> {
        T::set_volume_db(self, db)
    }

    fn set_mic_gain_db(&mut self, db: f32) -> Result<(), CodecError> {
        T::set_mic_gain_db(self, db)
    }

    fn mute_mic(&mut self, mute: bool) -> Result<(), CodecError> {
        T::mute_mic(self, mute)
    }

    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), CodecError> {
        T::write_register(self, reg, value)
    }

    fn read_register(&mut self, reg: u16) -> Result<u16, CodecError> {
        T::read_register(self, reg)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        T::close(self)
    }
}

/// Placeholder codec type for devices without a hardware codec.
///
/// Uninhabited: a `Option<NoCodec>` is always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoCodec {}

impl AudioCodec for NoCodec {
    type Config = ();

    fn capabilities(&self) -> CodecCaps {
        match *self {}
    }

    fn open(&mut self, _config: &()) -> Result<(), CodecError> {
        match *self {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct MuteOnly {
        muted: bool,
    }

    impl AudioCodec for MuteOnly {
        type Config = ();

        fn capabilities(&self) -> CodecCaps {
            CodecCaps::MUTE
        }

        fn open(&mut self, _config: &()) -> Result<(), CodecError> {
            Ok(())
        }

        fn mute(&mut self, mute: bool) -> Result<(), CodecError> {
            self.muted = mute;
            Ok(())
        }
    }

    #[test]
    fn caps_contains_and_union() {
        let caps = CodecCaps::MUTE | CodecCaps::VOLUME;
        assert!(caps.contains(CodecCaps::MUTE));
        assert!(caps.contains(CodecCaps::VOLUME));
        assert!(!caps.contains(CodecCaps::MIC_GAIN));
        assert!(caps.contains(CodecCaps::empty()));
        assert!(!caps.without(CodecCaps::VOLUME).contains(CodecCaps::VOLUME));
    }

    #[test]
    fn all_contains_every_flag() {
        for flag in [
            CodecCaps::ENABLE,
            CodecCaps::SET_FORMAT,
            CodecCaps::MUTE,
            CodecCaps::VOLUME,
            CodecCaps::MIC_GAIN,
            CodecCaps::MIC_MUTE,
            CodecCaps::REGISTER,
        ] {
            assert!(CodecCaps::all().contains(flag));
        }
    }

    #[test]
    fn default_operations_are_not_supported() {
        let mut codec = MuteOnly { muted: false };
        assert!(codec.is_open());
        assert_eq!(codec.set_volume_db(-10.0), Err(CodecError::NotSupported));
        assert_eq!(codec.enable(true), Err(CodecError::NotSupported));
        assert_eq!(codec.read_register(0), Err(CodecError::NotSupported));
        assert_eq!(codec.close(), Ok(()));
    }

    #[test]
    fn borrowed_codec_forwards_to_owner() {
        fn mute_through<C: AudioCodec>(mut codec: C) -> Result<CodecCaps, CodecError> {
            codec.mute(true)?;
            Ok(codec.capabilities())
        }

        let mut codec = MuteOnly { muted: false };
        assert_eq!(mute_through(&mut codec).unwrap(), CodecCaps::MUTE);
        assert!(codec.muted);
    }
}
