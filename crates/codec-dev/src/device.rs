//! Codec device session.
//!
//! A [`CodecDevice`] ties one PCM [`DataPath`] to an optional hardware
//! [`AudioCodec`] and presents a single open/read/write/volume/mute surface
//! for an input, output or duplex device.
//!
//! # State machine
//!
//! | State        | `open`               | `read`/`write`            | output setters | input setters | `close`      |
//! |--------------|----------------------|---------------------------|----------------|---------------|--------------|
//! | Unopened     | → Open / NotSupported | WrongState               | codec state    | codec state   | no-op        |
//! | Open(in)     | no-op                | read only                 | NotSupported¹  | ok            | → Unopened   |
//! | Open(out)    | no-op                | write only                | ok             | NotSupported¹ | → Unopened   |
//! | Open(in,out) | no-op                | both                      | ok             | ok            | → Unopened   |
//!
//! ¹ when the device type lacks that direction. Setters check direction
//! capability and the hardware codec's open state, not the session's.
//!
//! Output volume falls back to [`SoftwareGain`] when the codec has no
//! hardware volume. Mute and microphone controls have no fallback.

use codec_platform::{
    AudioCodec, CodecCaps, CodecError, DataCaps, DataPath, DeviceType, NoCodec, SampleInfo,
    VolMapPoint, VolumeCurve,
};

use crate::log::{debug, error, info, log_warn};
use crate::sw_volume::{SoftwareGain, DEFAULT_RAMP_MS};

/// Default supply voltage of the power amplifier.
pub const DEFAULT_PA_VOLTAGE: f32 = 5.0;

/// Default full-scale output voltage of the codec DAC.
pub const DEFAULT_DAC_VOLTAGE: f32 = 3.3;

/// Analog chain between DAC and speaker.
///
/// Used to compute a correction subtracted from every output level so that
/// a 0 dB request gives flat acoustic output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwGain {
    /// PA supply voltage in volts; `0.0` selects [`DEFAULT_PA_VOLTAGE`]
    pub pa_voltage: f32,
    /// DAC full-scale voltage in volts; `0.0` selects [`DEFAULT_DAC_VOLTAGE`]
    pub codec_dac_voltage: f32,
    /// Fixed gain of the PA in dB
    pub pa_gain_db: f32,
}

impl HwGain {
    /// Correction in dB: `20·log10(dac / pa) + pa_gain_db`.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] for negative or non-finite voltages or a
    /// non-finite PA gain.
    pub fn offset_db(&self) -> Result<f32, CodecError> {
        let pa = resolve_voltage(self.pa_voltage, DEFAULT_PA_VOLTAGE)?;
        let dac = resolve_voltage(self.codec_dac_voltage, DEFAULT_DAC_VOLTAGE)?;
        if !self.pa_gain_db.is_finite() {
            return Err(CodecError::InvalidArg);
        }
        Ok(20.0 * libm::log10f(dac / pa) + self.pa_gain_db)
    }
}

impl Default for HwGain {
    fn default() -> Self {
        Self {
            pa_voltage: DEFAULT_PA_VOLTAGE,
            codec_dac_voltage: DEFAULT_DAC_VOLTAGE,
            pa_gain_db: 0.0,
        }
    }
}

#[allow(clippy::float_cmp)] // exact 0.0 selects the default
fn resolve_voltage(v: f32, default: f32) -> Result<f32, CodecError> {
    if !v.is_finite() || v < 0.0 {
        Err(CodecError::InvalidArg)
    } else if v == 0.0 {
        Ok(default)
    } else {
        Ok(v)
    }
}

/// Session over one logical audio device.
///
/// The codec and data path are owned by value; pass `&mut driver` to keep
/// ownership at the call site. Dropping the session closes it but never
/// closes the drivers themselves.
pub struct CodecDevice<C: AudioCodec, D: DataPath> {
    dev_type: DeviceType,
    codec: Option<C>,
    data: D,
    input_open: bool,
    output_open: bool,
    volume: i32,
    muted: bool,
    mic_gain_db: f32,
    mic_muted: bool,
    hw_gain_db: f32,
    curve: VolumeCurve,
    sw_gain: Option<SoftwareGain>,
}

impl<D: DataPath> CodecDevice<NoCodec, D> {
    /// Session for a device without a controllable codec chip.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] for [`DeviceType::NONE`].
    pub fn without_codec(dev_type: DeviceType, data: D) -> Result<Self, CodecError> {
        Self::new(dev_type, None, data)
    }
}

impl<C: AudioCodec, D: DataPath> CodecDevice<C, D> {
    /// Create an unopened session.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] for [`DeviceType::NONE`].
    pub fn new(dev_type: DeviceType, codec: Option<C>, data: D) -> Result<Self, CodecError> {
        if dev_type.is_none() {
            return Err(CodecError::InvalidArg);
        }
        Ok(Self {
            dev_type,
            codec,
            data,
            input_open: false,
            output_open: false,
            volume: 0,
            muted: false,
            mic_gain_db: 0.0,
            mic_muted: false,
            hw_gain_db: 0.0,
            curve: VolumeCurve::default(),
            sw_gain: None,
        })
    }

    /// Open every direction of the device type whose drivers are ready.
    ///
    /// Idempotent: once any direction is open this returns `Ok` without
    /// looking at `info`. A direction whose drivers are not ready is logged
    /// and skipped.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArg`] for a malformed format
    /// - [`CodecError::NotSupported`] if no direction could be opened. Output
    ///   needing software volume counts as not ready unless `info` is 16-bit.
    pub fn open(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        if self.input_open || self.output_open {
            info!("codec device already open");
            return Ok(());
        }
        info.validate()?;
        if self.dev_type.has_input() {
            if self.drivers_ready(false) {
                self.input_open = true;
            } else {
                error!("codec device: input path not ready");
            }
        }
        if self.dev_type.has_output() {
            if self.drivers_ready(true) {
                self.output_open = true;
            } else {
                error!("codec device: output path not ready");
            }
        }
        let mut sw_error = None;
        let sw_gain = if self.output_open && !self.codec_has(CodecCaps::VOLUME) {
            match SoftwareGain::new(info, DEFAULT_RAMP_MS) {
                Ok(gain) => Some(gain),
                Err(e) => {
                    error!("codec device: software volume unavailable, output not opened: {}", e);
                    self.output_open = false;
                    sw_error = Some(e);
                    None
                }
            }
        } else {
            None
        };
        if !self.input_open && !self.output_open {
            return Err(sw_error.unwrap_or(CodecError::NotSupported));
        }

        if let Some(codec) = self.codec.as_mut() {
            if codec.capabilities().contains(CodecCaps::ENABLE) {
                if let Err(e) = codec.enable(true) {
                    log_warn!("codec device: codec enable failed: {}", e);
                }
            }
        }
        if self.data.capabilities().contains(DataCaps::SET_FORMAT) {
            if let Err(e) = self.data.set_format(info) {
                log_warn!("codec device: data path set_format failed: {}", e);
            }
        }
        self.sw_gain = sw_gain;
        info!(
            "codec device open: input={} output={} software volume={}",
            self.input_open,
            self.output_open,
            self.sw_gain.is_some()
        );
        Ok(())
    }

    /// Receive PCM into `buf`; returns the data path's byte count.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArg`] for an empty buffer
    /// - [`CodecError::WrongState`] unless input is open
    /// - [`CodecError::NotSupported`] if the data path cannot read
    /// - any data-path error, unchanged
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if buf.is_empty() {
            return Err(CodecError::InvalidArg);
        }
        if !self.input_open {
            return Err(CodecError::WrongState);
        }
        if !self.data.capabilities().contains(DataCaps::READ) {
            return Err(CodecError::NotSupported);
        }
        self.data.read(buf)
    }

    /// Send PCM from `buf`; returns the data path's byte count.
    ///
    /// With software volume active, `buf` is rewritten in place with the
    /// gain-processed samples before it is handed to the data path.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArg`] for an empty buffer
    /// - [`CodecError::WrongState`] unless output is open
    /// - [`CodecError::NotSupported`] if the data path cannot write
    /// - any data-path error, unchanged
    pub fn write(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if buf.is_empty() {
            return Err(CodecError::InvalidArg);
        }
        if !self.output_open {
            return Err(CodecError::WrongState);
        }
        if !self.data.capabilities().contains(DataCaps::WRITE) {
            return Err(CodecError::NotSupported);
        }
        if let Some(gain) = self.sw_gain.as_mut() {
            gain.process_in_place(buf);
        }
        self.data.write(buf)
    }

    /// Describe the analog chain after the DAC.
    ///
    /// Takes effect on the next [`CodecDevice::set_out_volume`].
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] for negative or non-finite values.
    pub fn set_hw_gain(&mut self, gain: HwGain) -> Result<(), CodecError> {
        self.hw_gain_db = gain.offset_db()?;
        info!("codec device: hardware gain offset {} dB", self.hw_gain_db);
        Ok(())
    }

    /// Replace the volume curve with a copy of `points`.
    ///
    /// On error the previous curve stays in place.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArg`] for an empty point list
    /// - [`CodecError::NotSupported`] without an output direction
    /// - [`CodecError::WrongState`] if the hardware codec is not open
    /// - [`CodecError::NoMemory`] for more than
    ///   [`MAX_CURVE_POINTS`](codec_platform::MAX_CURVE_POINTS) points
    pub fn set_vol_curve(&mut self, points: &[VolMapPoint]) -> Result<(), CodecError> {
        if points.is_empty() {
            return Err(CodecError::InvalidArg);
        }
        self.verify_setting(true)?;
        self.curve = VolumeCurve::from_points(points)?;
        Ok(())
    }

    /// Set output volume on the curve's scale (0–100 by convention).
    ///
    /// The level is `curve(vol) - hw_gain_db`, sent to the codec's hardware
    /// volume if it has one, else to software volume.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotSupported`] without an output direction
    /// - [`CodecError::WrongState`] if the hardware codec is not open, or no
    ///   hardware volume exists and output is not open
    /// - any codec error, unchanged
    pub fn set_out_volume(&mut self, vol: i32) -> Result<(), CodecError> {
        self.verify_setting(true)?;
        let db = self.curve.db_from_volume(vol) - self.hw_gain_db;
        match self.codec.as_mut() {
            Some(codec) if codec.capabilities().contains(CodecCaps::VOLUME) => {
                debug!("codec device: volume {} -> {} dB (hardware)", vol, db);
                codec.set_volume_db(db)?;
            }
            _ => {
                let gain = self.sw_gain.as_mut().ok_or(CodecError::WrongState)?;
                debug!("codec device: volume {} -> {} dB (software)", vol, db);
                gain.set_gain_db(db);
            }
        }
        self.volume = vol;
        Ok(())
    }

    /// Last volume accepted by [`CodecDevice::set_out_volume`].
    ///
    /// This is the nominal value as set, not one derived from the level
    /// currently applied.
    pub fn out_volume(&self) -> Result<i32, CodecError> {
        self.verify_setting(true)?;
        Ok(self.volume)
    }

    /// Mute or un-mute the output through the hardware codec.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotSupported`] without an output direction or
    ///   hardware mute
    /// - [`CodecError::WrongState`] if the hardware codec is not open
    /// - any codec error, unchanged
    pub fn set_out_mute(&mut self, mute: bool) -> Result<(), CodecError> {
        self.verify_setting(true)?;
        self.codec_with(CodecCaps::MUTE)?.mute(mute)?;
        self.muted = mute;
        Ok(())
    }

    /// Last output mute state set.
    pub fn out_mute(&self) -> Result<bool, CodecError> {
        self.verify_setting(true)?;
        Ok(self.muted)
    }

    /// Set microphone gain in dB through the hardware codec.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotSupported`] without an input direction or
    ///   hardware mic gain
    /// - [`CodecError::WrongState`] if the hardware codec is not open
    /// - any codec error, unchanged
    pub fn set_in_gain(&mut self, db: f32) -> Result<(), CodecError> {
        self.verify_setting(false)?;
        self.codec_with(CodecCaps::MIC_GAIN)?.set_mic_gain_db(db)?;
        self.mic_gain_db = db;
        Ok(())
    }

    /// Last microphone gain set, in dB.
    pub fn in_gain(&self) -> Result<f32, CodecError> {
        self.verify_setting(false)?;
        Ok(self.mic_gain_db)
    }

    /// Mute or un-mute the microphone through the hardware codec.
    ///
    /// # Errors
    ///
    /// - [`CodecError::NotSupported`] without an input direction or
    ///   hardware mic mute
    /// - [`CodecError::WrongState`] if the hardware codec is not open
    /// - any codec error, unchanged
    pub fn set_in_mute(&mut self, mute: bool) -> Result<(), CodecError> {
        self.verify_setting(false)?;
        self.codec_with(CodecCaps::MIC_MUTE)?.mute_mic(mute)?;
        self.mic_muted = mute;
        Ok(())
    }

    /// Last microphone mute state set.
    pub fn in_mute(&self) -> Result<bool, CodecError> {
        self.verify_setting(false)?;
        Ok(self.mic_muted)
    }

    /// Stop the codec, drop software volume and mark both directions
    /// closed. A no-op when nothing is open.
    pub fn close(&mut self) -> Result<(), CodecError> {
        if !self.input_open && !self.output_open {
            return Ok(());
        }
        if let Some(codec) = self.codec.as_mut() {
            if codec.capabilities().contains(CodecCaps::ENABLE) {
                if let Err(e) = codec.enable(false) {
                    log_warn!("codec device: codec disable failed: {}", e);
                }
            }
        }
        self.sw_gain = None;
        self.input_open = false;
        self.output_open = false;
        info!("codec device closed");
        Ok(())
    }

    /// Direction capability fixed at construction.
    pub fn device_type(&self) -> DeviceType {
        self.dev_type
    }

    /// Whether the input direction is open.
    pub fn is_input_open(&self) -> bool {
        self.input_open
    }

    /// Whether the output direction is open.
    pub fn is_output_open(&self) -> bool {
        self.output_open
    }

    /// Current hardware-gain correction in dB.
    pub fn hw_gain_db(&self) -> f32 {
        self.hw_gain_db
    }

    /// Active volume curve.
    pub fn volume_curve(&self) -> &VolumeCurve {
        &self.curve
    }

    /// Software volume engine, present while output is open without
    /// hardware volume.
    pub fn software_gain(&self) -> Option<&SoftwareGain> {
        self.sw_gain.as_ref()
    }

    /// Hardware codec, if any.
    pub fn codec(&self) -> Option<&C> {
        self.codec.as_ref()
    }

    /// Hardware codec, if any.
    pub fn codec_mut(&mut self) -> Option<&mut C> {
        self.codec.as_mut()
    }

    /// PCM data path.
    pub fn data_path(&self) -> &D {
        &self.data
    }

    /// PCM data path.
    pub fn data_path_mut(&mut self) -> &mut D {
        &mut self.data
    }

    fn codec_ready(&self) -> bool {
        self.codec.as_ref().map_or(true, AudioCodec::is_open)
    }

    fn codec_has(&self, cap: CodecCaps) -> bool {
        self.codec
            .as_ref()
            .is_some_and(|c| c.capabilities().contains(cap))
    }

    fn codec_with(&mut self, cap: CodecCaps) -> Result<&mut C, CodecError> {
        match self.codec.as_mut() {
            Some(codec) if codec.capabilities().contains(cap) => Ok(codec),
            _ => Err(CodecError::NotSupported),
        }
    }

    fn drivers_ready(&self, playback: bool) -> bool {
        if !self.codec_ready() {
            error!("codec device: codec is not open");
            return false;
        }
        if !self.data.is_open() {
            error!("codec device: data path is not open");
            return false;
        }
        let needed = if playback { DataCaps::WRITE } else { DataCaps::READ };
        if !self.data.capabilities().contains(needed) {
            error!("codec device: data path lacks {}", if playback { "write" } else { "read" });
            return false;
        }
        true
    }

    fn verify_setting(&self, playback: bool) -> Result<(), CodecError> {
        let has_dir = if playback {
            self.dev_type.has_output()
        } else {
            self.dev_type.has_input()
        };
        if !has_dir {
            return Err(CodecError::NotSupported);
        }
        if !self.codec_ready() {
            return Err(CodecError::WrongState);
        }
        Ok(())
    }
}

impl<C: AudioCodec, D: DataPath> Drop for CodecDevice<C, D> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use codec_platform::mocks::{MockCodec, MockDataPath};

    #[test]
    fn none_device_type_is_rejected() {
        let res = CodecDevice::without_codec(DeviceType::NONE, MockDataPath::new());
        assert!(matches!(res, Err(CodecError::InvalidArg)));
    }

    #[test]
    fn hw_gain_defaults_apply_to_zero_voltages() {
        let zero = HwGain {
            pa_voltage: 0.0,
            codec_dac_voltage: 0.0,
            pa_gain_db: 0.0,
        };
        let expected = 20.0 * libm::log10f(3.3 / 5.0);
        assert!((zero.offset_db().unwrap() - expected).abs() < 1e-5);
        assert_eq!(zero.offset_db(), HwGain::default().offset_db());
    }

    #[test]
    fn hw_gain_rejects_bad_voltages() {
        let neg = HwGain {
            pa_voltage: -1.0,
            ..HwGain::default()
        };
        assert_eq!(neg.offset_db(), Err(CodecError::InvalidArg));
        let nan = HwGain {
            codec_dac_voltage: f32::NAN,
            ..HwGain::default()
        };
        assert_eq!(nan.offset_db(), Err(CodecError::InvalidArg));
    }

    #[test]
    fn equal_voltages_leave_only_pa_gain() {
        let g = HwGain {
            pa_voltage: 3.3,
            codec_dac_voltage: 3.3,
            pa_gain_db: 6.0,
        };
        assert!((g.offset_db().unwrap() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_format_is_rejected_before_opening() {
        let mut dev = CodecDevice::without_codec(DeviceType::OUT, MockDataPath::new()).unwrap();
        assert_eq!(dev.open(&SampleInfo::new(16, 2, 0)), Err(CodecError::InvalidArg));
        assert!(!dev.is_output_open());
    }

    #[test]
    fn software_gain_needs_16bit() {
        let mut dev = CodecDevice::without_codec(DeviceType::OUT, MockDataPath::new()).unwrap();
        assert_eq!(dev.open(&SampleInfo::new(24, 2, 48_000)), Err(CodecError::NotSupported));
        assert!(!dev.is_output_open());
        assert!(dev.software_gain().is_none());
    }

    #[test]
    fn hardware_volume_allows_any_bit_depth() {
        let mut dev = CodecDevice::new(DeviceType::OUT, Some(MockCodec::new()), MockDataPath::new()).unwrap();
        dev.open(&SampleInfo::new(32, 2, 96_000)).unwrap();
        assert!(dev.is_output_open());
        assert!(dev.software_gain().is_none());
    }

    #[test]
    fn hw_gain_offset_is_subtracted_from_volume() {
        let mut dev = CodecDevice::new(DeviceType::OUT, Some(MockCodec::new()), MockDataPath::new()).unwrap();
        dev.open(&SampleInfo::default()).unwrap();
        dev.set_vol_curve(&[VolMapPoint::new(0, 0.0), VolMapPoint::new(100, 100.0)]).unwrap();
        dev.set_hw_gain(HwGain {
            pa_voltage: 1.0,
            codec_dac_voltage: 1.0,
            pa_gain_db: 10.0,
        })
        .unwrap();
        dev.set_out_volume(50).unwrap();
        assert_eq!(dev.codec().unwrap().reg(MockCodec::REG_VOLUME), 40);
        assert_eq!(dev.out_volume(), Ok(50));
    }

    #[test]
    fn empty_curve_is_invalid_and_keeps_previous() {
        let mut dev = CodecDevice::new(DeviceType::OUT, Some(MockCodec::new()), MockDataPath::new()).unwrap();
        assert_eq!(dev.set_vol_curve(&[]), Err(CodecError::InvalidArg));
        assert_eq!(dev.volume_curve(), &VolumeCurve::default());
    }

    #[test]
    fn drop_closes_the_session() {
        let mut codec = MockCodec::new();
        {
            let mut dev = CodecDevice::new(DeviceType::OUT, Some(&mut codec), MockDataPath::new()).unwrap();
            dev.open(&SampleInfo::default()).unwrap();
        }
        assert!(!codec.is_enabled());
        assert_eq!(codec.enable_calls(), 2);
    }
}
