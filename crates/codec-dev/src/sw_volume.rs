//! Software volume for codecs without hardware gain.
//!
//! Applies a Q15 fixed-point gain to interleaved 16-bit PCM. A gain change
//! is spread over `ramp_ms` milliseconds by moving the applied gain a fixed
//! step once per frame, which keeps volume changes free of audible clicks.
//!
//! ```text
//!  gain
//!  1<<15 ───────┐
//!               ╲  step per frame
//!                ╲
//!  target         ╲_________________
//!          ▲ set_gain_db()
//! ```

use codec_platform::{CodecError, SampleInfo, SILENCE_DB};

/// Fractional bits of the fixed-point gain.
pub const GAIN_SHIFT: u32 = 15;

/// Fixed-point representation of 0 dB.
pub const UNITY_GAIN: i32 = 1 << GAIN_SHIFT;

/// Ramp duration used by codec devices.
pub const DEFAULT_RAMP_MS: u32 = 50;

/// Convert a level in dB to Q15 gain. At or below [`SILENCE_DB`] the gain
/// is exactly zero.
#[allow(clippy::cast_possible_truncation)] // saturating float → int cast
pub fn gain_from_db(db: f32) -> i32 {
    if db <= SILENCE_DB {
        return 0;
    }
    libm::roundf(libm::powf(10.0, db / 20.0) * UNITY_GAIN as f32) as i32
}

/// Ramped fixed-point gain for one output stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareGain {
    info: SampleInfo,
    current: i32,
    target: i32,
    step: i32,
    ramp_ms: u32,
}

impl SoftwareGain {
    /// Create an engine at unity gain.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArg`] for a malformed format
    /// - [`CodecError::NotSupported`] unless `info` is 16-bit PCM
    pub fn new(info: &SampleInfo, ramp_ms: u32) -> Result<Self, CodecError> {
        info.validate()?;
        if info.bits_per_sample != 16 {
            return Err(CodecError::NotSupported);
        }
        Ok(Self {
            info: *info,
            current: UNITY_GAIN,
            target: UNITY_GAIN,
            step: 0,
            ramp_ms,
        })
    }

    /// Set the target level in dB.
    ///
    /// The applied gain moves toward the target by a per-frame step of
    /// `(target - current) * 1000 / ramp_ms / sample_rate`. When that step
    /// truncates to zero, or the target is silence, the gain changes at once.
    #[allow(clippy::arithmetic_side_effects)] // i64 over i32 operands; divisor checked
    #[allow(clippy::cast_possible_truncation)] // |step| <= |target - current|
    pub fn set_gain_db(&mut self, db: f32) {
        self.target = gain_from_db(db);
        let delta = i64::from(self.target) - i64::from(self.current);
        let frames_x1000 = i64::from(self.ramp_ms) * i64::from(self.info.sample_rate);
        let step = if frames_x1000 == 0 {
            0
        } else {
            delta * 1000 / frames_x1000
        };
        self.step = step.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        if self.step == 0 || self.target == 0 {
            self.current = self.target;
            self.step = 0;
        }
    }

    /// Apply gain to little-endian 16-bit PCM from `input` into `output`.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArg`] if `output` is shorter than `input`.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), CodecError> {
        let out = output.get_mut(..input.len()).ok_or(CodecError::InvalidArg)?;
        out.copy_from_slice(input);
        self.process_in_place(out);
        Ok(())
    }

    /// Apply gain to little-endian 16-bit PCM in place.
    ///
    /// Only whole frames are scaled. At zero gain the entire buffer is
    /// cleared, trailing partial frame included.
    pub fn process_in_place(&mut self, buf: &mut [u8]) {
        if self.is_silent() {
            buf.fill(0);
            return;
        }
        if self.is_settled_at_unity() {
            return;
        }
        for frame in buf.chunks_exact_mut(self.info.frame_bytes()) {
            for sample in frame.chunks_exact_mut(2) {
                let [lo, hi] = sample else { continue };
                let [a, b] = scale(i16::from_le_bytes([*lo, *hi]), self.current).to_le_bytes();
                *lo = a;
                *hi = b;
            }
            self.advance();
        }
    }

    /// Apply gain to interleaved samples in place.
    pub fn process_samples(&mut self, samples: &mut [i16]) {
        if self.is_silent() {
            samples.fill(0);
            return;
        }
        if self.is_settled_at_unity() {
            return;
        }
        for frame in samples.chunks_exact_mut(usize::from(self.info.channels)) {
            for s in frame.iter_mut() {
                *s = scale(*s, self.current);
            }
            self.advance();
        }
    }

    /// Gain applied to the next frame (Q15).
    pub fn current_gain(&self) -> i32 {
        self.current
    }

    /// Gain the ramp is heading to (Q15).
    pub fn target_gain(&self) -> i32 {
        self.target
    }

    /// Per-frame gain increment; zero once settled.
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Ramp duration in milliseconds.
    pub fn ramp_ms(&self) -> u32 {
        self.ramp_ms
    }

    /// Stream format.
    pub fn sample_info(&self) -> &SampleInfo {
        &self.info
    }

    fn is_silent(&self) -> bool {
        self.current == 0 && self.target == 0
    }

    fn is_settled_at_unity(&self) -> bool {
        self.current == UNITY_GAIN && self.target == UNITY_GAIN
    }

    fn advance(&mut self) {
        if self.step == 0 {
            return;
        }
        self.current = self.current.saturating_add(self.step);
        let reached = if self.step > 0 {
            self.current >= self.target
        } else {
            self.current <= self.target
        };
        if reached {
            self.current = self.target;
            self.step = 0;
        }
    }
}

#[allow(clippy::arithmetic_side_effects)] // i16 * i32 always fits i64
#[allow(clippy::cast_possible_truncation)] // clamped to i16 range first
fn scale(sample: i16, gain: i32) -> i16 {
    let scaled = (i64::from(sample) * i64::from(gain)) >> GAIN_SHIFT;
    scaled.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn stereo_48k() -> SoftwareGain {
        SoftwareGain::new(&SampleInfo::new(16, 2, 48_000), DEFAULT_RAMP_MS).unwrap()
    }

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    fn samples(bytes: &[u8]) -> Vec<i16> {
        bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn only_16bit_is_supported() {
        let info = SampleInfo::new(24, 2, 48_000);
        assert_eq!(SoftwareGain::new(&info, 50), Err(CodecError::NotSupported));
        let info = SampleInfo::new(16, 0, 48_000);
        assert_eq!(SoftwareGain::new(&info, 50), Err(CodecError::InvalidArg));
    }

    #[test]
    fn starts_at_unity() {
        let gain = stereo_48k();
        assert_eq!(gain.current_gain(), UNITY_GAIN);
        assert_eq!(gain.target_gain(), UNITY_GAIN);
        assert_eq!(gain.step(), 0);
        assert_eq!(gain.ramp_ms(), 50);
    }

    #[test]
    fn gain_from_db_reference_points() {
        assert_eq!(gain_from_db(0.0), UNITY_GAIN);
        assert_eq!(gain_from_db(-96.0), 0);
        assert_eq!(gain_from_db(-200.0), 0);
        // -6.0206 dB is one half
        assert!((gain_from_db(-6.0206) - UNITY_GAIN / 2).abs() <= 1);
        assert!((gain_from_db(-20.0) - 3277).abs() <= 1);
    }

    #[test]
    fn unity_is_identity() {
        let mut gain = stereo_48k();
        let input = pcm(&[1, -1, i16::MAX, i16::MIN, 1234, -4321]);
        let mut out = vec![0u8; input.len()];
        gain.process(&input, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn silence_is_immediate_and_exact() {
        let mut gain = stereo_48k();
        gain.set_gain_db(-96.0);
        assert_eq!(gain.current_gain(), 0);
        let mut buf = pcm(&[1000, -1000, 32767, -32768]);
        buf.push(0x7F); // partial frame
        gain.process_in_place(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn small_change_snaps_to_target() {
        let mut gain = stereo_48k();
        // delta ≈ -375 → step truncates to zero at 50 ms / 48 kHz
        gain.set_gain_db(-0.1);
        assert_eq!(gain.step(), 0);
        assert_eq!(gain.current_gain(), gain.target_gain());
    }

    #[test]
    fn large_change_ramps_per_frame() {
        let mut gain = stereo_48k();
        gain.set_gain_db(-20.0);
        let step = gain.step();
        assert!(step < 0);

        let mut buf = [10_000i16; 8]; // 4 frames
        gain.process_samples(&mut buf);
        // both channels of a frame share one gain value
        assert_eq!(buf[0], buf[1]);
        assert_eq!(buf[6], buf[7]);
        // gain only decreases across frames
        assert!(buf[0] >= buf[2] && buf[2] >= buf[4] && buf[4] >= buf[6]);
        assert_eq!(gain.current_gain(), UNITY_GAIN + 4 * step);
    }

    #[test]
    fn ramp_reaches_target_and_stops() {
        let mut gain = stereo_48k();
        gain.set_gain_db(-20.0);
        let target = gain.target_gain();
        // twice the nominal ramp length covers truncation of the step
        let mut block = vec![100i16; 2 * 2 * 2400];
        gain.process_samples(&mut block);
        assert_eq!(gain.current_gain(), target);
        assert_eq!(gain.step(), 0);

        gain.set_gain_db(0.0);
        let mut block = vec![100i16; 2 * 2 * 2400];
        gain.process_samples(&mut block);
        assert_eq!(gain.current_gain(), UNITY_GAIN);

        let mut buf = [321i16, -321, 7, -7];
        gain.process_samples(&mut buf);
        assert_eq!(buf, [321, -321, 7, -7]);
    }

    #[test]
    fn zero_ramp_is_immediate() {
        let mut gain = SoftwareGain::new(&SampleInfo::new(16, 1, 16_000), 0).unwrap();
        gain.set_gain_db(-20.0);
        assert_eq!(gain.current_gain(), gain.target_gain());
    }

    #[test]
    fn positive_gain_saturates() {
        let mut gain = SoftwareGain::new(&SampleInfo::new(16, 1, 16_000), 0).unwrap();
        gain.set_gain_db(12.0);
        let mut buf = [30_000i16, -30_000, 100];
        gain.process_samples(&mut buf);
        assert_eq!(buf[0], i16::MAX);
        assert_eq!(buf[1], i16::MIN);
        assert!(buf[2] > 100);
    }

    #[test]
    fn trailing_partial_frame_is_untouched() {
        let mut gain = SoftwareGain::new(&SampleInfo::new(16, 2, 48_000), 0).unwrap();
        gain.set_gain_db(-6.0206);
        let half = scale(1000, gain.current_gain());
        assert!((499..=500).contains(&half));
        let mut buf = pcm(&[1000, 1000, 1000]); // 1.5 frames
        gain.process_in_place(&mut buf);
        assert_eq!(samples(&buf), vec![half, half, 1000]);
    }

    #[test]
    fn short_output_is_invalid() {
        let mut gain = stereo_48k();
        let input = [0u8; 8];
        let mut out = [0u8; 4];
        assert_eq!(gain.process(&input, &mut out), Err(CodecError::InvalidArg));
    }
}
