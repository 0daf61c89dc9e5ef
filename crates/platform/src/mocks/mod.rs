//! Mock implementations for testing
//!
//! In-process fakes of the driver traits for unit and integration tests.
//! None of them touch hardware; all state is inspectable.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use crate::*;

/// Register-backed fake codec.
///
/// Each control operation writes one byte register, so a test can observe
/// exactly what the session forwarded:
///
/// | Register              | Written by          | Value            |
/// |-----------------------|---------------------|------------------|
/// | [`MockCodec::REG_VOLUME`]   | `set_volume_db`   | dB truncated to integer |
/// | [`MockCodec::REG_MUTE`]     | `mute`            | 1 / 0            |
/// | [`MockCodec::REG_MIC_GAIN`] | `set_mic_gain_db` | dB truncated to integer |
/// | [`MockCodec::REG_MIC_MUTE`] | `mute_mic`        | 1 / 0            |
#[derive(Debug, Clone)]
pub struct MockCodec {
    caps: CodecCaps,
    regs: [u8; Self::REG_COUNT],
    is_open: bool,
    enabled: bool,
    enable_calls: usize,
    format: Option<SampleInfo>,
}

impl MockCodec {
    /// Volume register
    pub const REG_VOLUME: u16 = 0;
    /// Output mute register
    pub const REG_MUTE: u16 = 1;
    /// Microphone gain register
    pub const REG_MIC_GAIN: u16 = 2;
    /// Microphone mute register
    pub const REG_MIC_MUTE: u16 = 3;
    const REG_COUNT: usize = 4;

    /// Codec supporting every operation, already open.
    pub fn new() -> Self {
        Self::with_caps(CodecCaps::all())
    }

    /// Codec supporting only `caps`, already open.
    pub fn with_caps(caps: CodecCaps) -> Self {
        Self {
            caps,
            regs: [0; Self::REG_COUNT],
            is_open: true,
            enabled: false,
            enable_calls: 0,
            format: None,
        }
    }

    /// Force the reported open state.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Current value of register `reg` (0 for unknown registers).
    pub fn reg(&self, reg: u16) -> u8 {
        self.regs.get(usize::from(reg)).copied().unwrap_or(0)
    }

    /// Whether converters are running.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of `enable` calls (either direction).
    pub fn enable_calls(&self) -> usize {
        self.enable_calls
    }

    /// Format last passed to `set_format`.
    pub fn format(&self) -> Option<SampleInfo> {
        self.format
    }

    fn require(&self, cap: CodecCaps) -> Result<(), CodecError> {
        if self.caps.contains(cap) {
            Ok(())
        } else {
            Err(CodecError::NotSupported)
        }
    }

    fn store(&mut self, reg: u16, value: u8) -> Result<(), CodecError> {
        let slot = self.regs.get_mut(usize::from(reg)).ok_or(CodecError::InvalidArg)?;
        *slot = value;
        Ok(())
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCodec for MockCodec {
    type Config = ();

    fn capabilities(&self) -> CodecCaps {
        self.caps
    }

    fn open(&mut self, _config: &()) -> Result<(), CodecError> {
        self.is_open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn enable(&mut self, enable: bool) -> Result<(), CodecError> {
        self.require(CodecCaps::ENABLE)?;
        self.enabled = enable;
        self.enable_calls = self.enable_calls.saturating_add(1);
        Ok(())
    }

    fn set_format(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        self.require(CodecCaps::SET_FORMAT)?;
        self.format = Some(*info);
        Ok(())
    }

    fn mute(&mut self, mute: bool) -> Result<(), CodecError> {
        self.require(CodecCaps::MUTE)?;
        self.store(Self::REG_MUTE, u8::from(mute))
    }

    fn set_volume_db(&mut self, db: f32) -> Result<(), CodecError> {
        self.require(CodecCaps::VOLUME)?;
        self.store(Self::REG_VOLUME, db as i32 as u8)
    }

    fn set_mic_gain_db(&mut self, db: f32) -> Result<(), CodecError> {
        self.require(CodecCaps::MIC_GAIN)?;
        self.store(Self::REG_MIC_GAIN, db as i32 as u8)
    }

    fn mute_mic(&mut self, mute: bool) -> Result<(), CodecError> {
        self.require(CodecCaps::MIC_MUTE)?;
        self.store(Self::REG_MIC_MUTE, u8::from(mute))
    }

    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), CodecError> {
        self.require(CodecCaps::REGISTER)?;
        self.store(reg, value as u8)
    }

    fn read_register(&mut self, reg: u16) -> Result<u16, CodecError> {
        self.require(CodecCaps::REGISTER)?;
        self.regs
            .get(usize::from(reg))
            .map(|&v| u16::from(v))
            .ok_or(CodecError::InvalidArg)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        self.is_open = false;
        self.enabled = false;
        Ok(())
    }
}

/// Bytes of the most recent write kept for inspection.
pub const MOCK_WRITE_CAPTURE: usize = 4096;

/// Fake PCM transport.
///
/// `read` yields an incrementing byte pattern that continues across calls
/// (0, 1, 2, … wrapping at 256). `write` counts bytes and captures the
/// first [`MOCK_WRITE_CAPTURE`] bytes of the latest block.
#[derive(Debug, Clone)]
pub struct MockDataPath {
    caps: DataCaps,
    is_open: bool,
    format: Option<SampleInfo>,
    read_idx: usize,
    written: usize,
    last_write: heapless::Vec<u8, MOCK_WRITE_CAPTURE>,
    fail_writes: bool,
}

impl MockDataPath {
    /// Read/write/format-capable transport, already open.
    pub fn new() -> Self {
        Self::with_caps(DataCaps::READ | DataCaps::WRITE | DataCaps::SET_FORMAT)
    }

    /// Transport with only `caps`, already open.
    pub fn with_caps(caps: DataCaps) -> Self {
        Self {
            caps,
            is_open: true,
            format: None,
            read_idx: 0,
            written: 0,
            last_write: heapless::Vec::new(),
            fail_writes: false,
        }
    }

    /// Force the reported open state.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Make every subsequent write fail with [`CodecError::WriteFail`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Format last applied with `set_format`.
    pub fn format(&self) -> Option<SampleInfo> {
        self.format
    }

    /// Total bytes accepted by `write`.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Total bytes produced by `read`.
    pub fn bytes_read(&self) -> usize {
        self.read_idx
    }

    /// Captured prefix of the latest write.
    pub fn last_write(&self) -> &[u8] {
        &self.last_write
    }

    fn require(&self, cap: DataCaps) -> Result<(), CodecError> {
        if self.caps.contains(cap) {
            Ok(())
        } else {
            Err(CodecError::NotSupported)
        }
    }
}

impl Default for MockDataPath {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPath for MockDataPath {
    type Config = ();

    fn capabilities(&self) -> DataCaps {
        self.caps
    }

    fn open(&mut self, _config: &()) -> Result<(), CodecError> {
        self.is_open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn set_format(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        self.require(DataCaps::SET_FORMAT)?;
        self.format = Some(*info);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        self.require(DataCaps::READ)?;
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_idx.wrapping_add(i) as u8;
        }
        self.read_idx = self.read_idx.saturating_add(buf.len());
        Ok(buf.len())
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, CodecError> {
        self.require(DataCaps::WRITE)?;
        if self.fail_writes {
            return Err(CodecError::WriteFail);
        }
        self.last_write.clear();
        let keep = buf.len().min(MOCK_WRITE_CAPTURE);
        let _ = self.last_write.extend_from_slice(buf.get(..keep).unwrap_or_default());
        self.written = self.written.saturating_add(buf.len());
        Ok(buf.len())
    }

    fn close(&mut self) -> Result<(), CodecError> {
        self.is_open = false;
        Ok(())
    }
}

/// Number of pins tracked by [`MockGpio`].
pub const MOCK_GPIO_PINS: usize = 64;

/// Fake GPIO bank that records configuration and levels.
#[derive(Debug, Clone)]
pub struct MockGpio {
    levels: [bool; MOCK_GPIO_PINS],
    config: [Option<(GpioDirection, GpioMode)>; MOCK_GPIO_PINS],
    set_calls: usize,
}

impl MockGpio {
    /// All pins unconfigured and low.
    pub fn new() -> Self {
        Self {
            levels: [false; MOCK_GPIO_PINS],
            config: [None; MOCK_GPIO_PINS],
            set_calls: 0,
        }
    }

    /// Direction and mode last passed to `setup` for `pin`.
    pub fn config(&self, pin: u16) -> Option<(GpioDirection, GpioMode)> {
        self.config.get(usize::from(pin)).copied().flatten()
    }

    /// Number of `set` calls on any pin.
    pub fn set_calls(&self) -> usize {
        self.set_calls
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioProvider for MockGpio {
    fn setup(&mut self, pin: u16, dir: GpioDirection, mode: GpioMode) -> Result<(), CodecError> {
        let slot = self.config.get_mut(usize::from(pin)).ok_or(CodecError::InvalidArg)?;
        *slot = Some((dir, mode));
        Ok(())
    }

    fn set(&mut self, pin: u16, high: bool) -> Result<(), CodecError> {
        let slot = self.levels.get_mut(usize::from(pin)).ok_or(CodecError::InvalidArg)?;
        *slot = high;
        self.set_calls = self.set_calls.saturating_add(1);
        Ok(())
    }

    fn get(&self, pin: u16) -> bool {
        self.levels.get(usize::from(pin)).copied().unwrap_or(false)
    }
}
