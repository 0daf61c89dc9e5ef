//! ES8156 driver
//!
//! Register control over a blocking `embedded_hal::i2c::I2c` bus. PCM is
//! carried separately by the device's [`DataPath`](codec_platform::DataPath).
//!
//! An optional power-amplifier enable pin is driven through the
//! [`GpioProvider`] handed to [`Es8156::new`]: high after `open`, low on
//! `close`.

use embedded_hal::i2c::I2c;

use codec_platform::{set_pa_power, AudioCodec, CodecCaps, CodecError, GpioProvider, I2cAddr};

use super::registers::*;
use crate::log::{debug, info, log_warn};

/// Configuration applied by [`AudioCodec::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Es8156Config {
    /// 7-bit I²C address
    pub addr: I2cAddr,
    /// PA enable pin, if the board has one
    pub pa_pin: Option<u16>,
}

impl Default for Es8156Config {
    fn default() -> Self {
        Self {
            addr: I2cAddr::from_8bit(DEFAULT_ADDR_8BIT),
            pa_pin: None,
        }
    }
}

/// Everest ES8156 stereo DAC.
pub struct Es8156<I, G> {
    i2c: I,
    gpio: G,
    addr: I2cAddr,
    pa_pin: Option<u16>,
    is_open: bool,
}

impl<I: I2c, G: GpioProvider> Es8156<I, G> {
    /// Create a closed driver. No bus traffic happens until `open`.
    pub fn new(i2c: I, gpio: G) -> Self {
        let cfg = Es8156Config::default();
        Self {
            i2c,
            gpio,
            addr: cfg.addr,
            pa_pin: cfg.pa_pin,
            is_open: false,
        }
    }

    /// Current digital volume read back from the chip, in dB.
    pub fn volume_db(&mut self) -> Result<f32, CodecError> {
        self.ensure_open()?;
        let reg = self.read_reg(REG_VOLUME_CONTROL)?;
        let db = VOL_RANGE.db_from_reg(i32::from(reg));
        debug!("ES8156 volume reg {} = {} dB", reg, db);
        Ok(db)
    }

    /// Give back the bus and GPIO provider.
    pub fn release(self) -> (I, G) {
        (self.i2c, self.gpio)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), CodecError> {
        self.i2c
            .write(self.addr.get(), &[reg, value])
            .map_err(|_| CodecError::WriteFail)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, CodecError> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.addr.get(), &[reg], &mut buf)
            .map_err(|_| CodecError::ReadFail)?;
        let [value] = buf;
        Ok(value)
    }

    fn write_sequence(&mut self, seq: &[(u8, u8)]) -> Result<(), CodecError> {
        for &(reg, value) in seq {
            self.write_reg(reg, value)?;
        }
        Ok(())
    }

    fn pa_power(&mut self, enable: bool) {
        let Some(pin) = self.pa_pin else { return };
        match set_pa_power(&mut self.gpio, pin, enable) {
            Ok(()) => info!("ES8156 PA pin {} enable {}", pin, enable),
            Err(e) => log_warn!("ES8156 PA pin {} control failed: {}", pin, e),
        }
    }

    fn ensure_open(&self) -> Result<(), CodecError> {
        if self.is_open {
            Ok(())
        } else {
            Err(CodecError::WrongState)
        }
    }
}

impl<I: I2c, G: GpioProvider> AudioCodec for Es8156<I, G> {
    type Config = Es8156Config;

    fn capabilities(&self) -> CodecCaps {
        CodecCaps::ENABLE | CodecCaps::MUTE | CodecCaps::VOLUME | CodecCaps::REGISTER
    }

    fn open(&mut self, config: &Es8156Config) -> Result<(), CodecError> {
        self.addr = config.addr;
        self.pa_pin = config.pa_pin;
        self.write_sequence(OPEN_SEQUENCE)?;
        self.pa_power(true);
        self.is_open = true;
        info!("ES8156 open at address {}", self.addr.get());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    /// Start or stop the converters.
    ///
    /// Starting writes [`VOLUME_DEFAULT`] to the volume register, so a
    /// caller holding a level must re-apply it after a restart.
    fn enable(&mut self, enable: bool) -> Result<(), CodecError> {
        self.ensure_open()?;
        if enable {
            self.write_sequence(START_SEQUENCE)
        } else {
            log_warn!("ES8156 stopping");
            self.write_sequence(STOP_SEQUENCE)
        }
    }

    fn mute(&mut self, mute: bool) -> Result<(), CodecError> {
        self.ensure_open()?;
        let current = self.read_reg(REG_DAC_MUTE)?;
        let value = if mute {
            current | DAC_MUTE_MASK
        } else {
            current & !DAC_MUTE_MASK
        };
        self.write_reg(REG_DAC_MUTE, value)
    }

    fn set_volume_db(&mut self, db: f32) -> Result<(), CodecError> {
        self.ensure_open()?;
        let reg = u8::try_from(VOL_RANGE.reg_from_db(db)).map_err(|_| CodecError::InvalidArg)?;
        debug!("ES8156 volume {} dB -> reg {}", db, reg);
        self.write_reg(REG_VOLUME_CONTROL, reg)
    }

    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), CodecError> {
        self.ensure_open()?;
        let reg = u8::try_from(reg).map_err(|_| CodecError::InvalidArg)?;
        let value = u8::try_from(value).map_err(|_| CodecError::InvalidArg)?;
        self.write_reg(reg, value)
    }

    fn read_register(&mut self, reg: u16) -> Result<u16, CodecError> {
        self.ensure_open()?;
        let reg = u8::try_from(reg).map_err(|_| CodecError::InvalidArg)?;
        self.read_reg(reg).map(u16::from)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        if !self.is_open {
            return Ok(());
        }
        let stopped = self.write_sequence(STOP_SEQUENCE);
        self.pa_power(false);
        self.is_open = false;
        stopped
    }
}
