//! Volume scale ↔ decibel ↔ register conversion
//!
//! Two mappings are used by every codec device:
//!
//! - [`VolumeCurve`]: application volume (0–100 by convention) to dB,
//!   piecewise-linear over calibration points. Owned by the session.
//! - [`VolRange`]: dB to chip register code over a two-point `{min, max}`
//!   range. Owned by each chip driver as a `const`.
//!
//! Neither mapping rejects input: out-of-range values clamp.

use crate::error::CodecError;

/// Level reported for volume 0 regardless of curve content.
pub const SILENCE_DB: f32 = -96.0;

/// Maximum number of calibration points a [`VolumeCurve`] can hold.
pub const MAX_CURVE_POINTS: usize = 32;

/// One calibration point: volume `vol` corresponds to `db` decibels.
///
/// For a [`VolRange`] the `vol` field is a raw register code.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolMapPoint {
    /// Volume (or register code)
    pub vol: i32,
    /// Level in dB
    pub db: f32,
}

impl VolMapPoint {
    /// Create a point.
    pub const fn new(vol: i32, db: f32) -> Self {
        Self { vol, db }
    }
}

// ── VolumeCurve ──────────────────────────────────────────────────────────────

/// Volume-to-dB calibration curve.
///
/// Points are expected in ascending `vol` order. This is not enforced:
/// caller-supplied curves are used as given, and lookups on degenerate
/// curves return a defined value instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeCurve {
    points: heapless::Vec<VolMapPoint, MAX_CURVE_POINTS>,
}

impl VolumeCurve {
    /// Empty curve. Every non-zero volume maps to 0 dB.
    pub const fn new() -> Self {
        Self {
            points: heapless::Vec::new(),
        }
    }

    /// Copy `points` into a new curve.
    ///
    /// # Errors
    ///
    /// [`CodecError::NoMemory`] if more than [`MAX_CURVE_POINTS`] are given.
    pub fn from_points(points: &[VolMapPoint]) -> Result<Self, CodecError> {
        let points = heapless::Vec::from_slice(points).map_err(|_| CodecError::NoMemory)?;
        Ok(Self { points })
    }

    /// Calibration points.
    pub fn points(&self) -> &[VolMapPoint] {
        &self.points
    }

    /// Number of calibration points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Level in dB for `volume`.
    ///
    /// - `0` → [`SILENCE_DB`]
    /// - empty curve → `0.0`
    /// - at or above the last point → last point's dB
    /// - otherwise linear interpolation on the bracketing segment; below the
    ///   first point the first segment is extended
    /// - a zero-width bracketing segment → `0.0`
    #[allow(clippy::cast_precision_loss)] // volumes are small integers
    pub fn db_from_volume(&self, volume: i32) -> f32 {
        if volume == 0 {
            return SILENCE_DB;
        }
        let Some(last) = self.points.last() else {
            return 0.0;
        };
        if volume >= last.vol {
            return last.db;
        }
        for pair in self.points.windows(2) {
            let [lo, hi] = pair else { break };
            if volume < hi.vol {
                if lo.vol == hi.vol {
                    break;
                }
                let ratio = (hi.db - lo.db) / (hi.vol as f32 - lo.vol as f32);
                return lo.db + (volume as f32 - lo.vol as f32) * ratio;
            }
        }
        0.0
    }
}

impl Default for VolumeCurve {
    /// Linear two-point curve: 0 → -50 dB, 100 → 0 dB.
    fn default() -> Self {
        let mut points = heapless::Vec::new();
        let _ = points.push(VolMapPoint::new(0, -50.0));
        let _ = points.push(VolMapPoint::new(100, 0.0));
        Self { points }
    }
}

// ── VolRange ─────────────────────────────────────────────────────────────────

/// Register range of a chip's volume control.
///
/// `min` is the quietest setting, `max` the loudest. The register code of
/// `max` may be lower than that of `min` on chips with attenuation-style
/// registers; both conversions handle either orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolRange {
    /// Quietest register code and its level
    pub min: VolMapPoint,
    /// Loudest register code and its level
    pub max: VolMapPoint,
}

impl VolRange {
    /// Create a range.
    pub const fn new(min: VolMapPoint, max: VolMapPoint) -> Self {
        Self { min, max }
    }

    /// Register code for `db`, clamped to the range.
    ///
    /// Intermediate values truncate toward zero.
    #[allow(
        clippy::cast_precision_loss, // register codes fit f32 exactly
        clippy::cast_possible_truncation, // truncation is the register rounding
        clippy::float_cmp
    )]
    pub fn reg_from_db(&self, db: f32) -> i32 {
        let (min, max) = (self.min, self.max);
        if max.db == min.db {
            return max.vol;
        }
        let (lo_db, hi_db) = if max.db > min.db {
            (min.db, max.db)
        } else {
            (max.db, min.db)
        };
        if db >= hi_db {
            return if max.db > min.db { max.vol } else { min.vol };
        }
        if db <= lo_db {
            return if max.db > min.db { min.vol } else { max.vol };
        }
        let ratio = (max.vol as f32 - min.vol as f32) / (max.db - min.db);
        ((db - min.db) * ratio + min.vol as f32) as i32
    }

    /// Level in dB for register code `reg`, clamped to the range.
    #[allow(clippy::cast_precision_loss)]
    pub fn db_from_reg(&self, reg: i32) -> f32 {
        let (min, max) = (self.min, self.max);
        if max.vol == min.vol {
            return max.db;
        }
        if max.vol > min.vol {
            if reg >= max.vol {
                return max.db;
            }
            if reg <= min.vol {
                return min.db;
            }
        } else {
            if reg <= max.vol {
                return max.db;
            }
            if reg >= min.vol {
                return min.db;
            }
        }
        let ratio = (max.db - min.db) / (max.vol as f32 - min.vol as f32);
        (reg as f32 - min.vol as f32) * ratio + min.db
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn default_curve_is_linear_minus_50_to_0() {
        let curve = VolumeCurve::default();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve.db_from_volume(0), SILENCE_DB);
        assert_eq!(curve.db_from_volume(100), 0.0);
        assert!(approx(curve.db_from_volume(50), -25.0));
        assert!(approx(curve.db_from_volume(1), -49.5));
    }

    #[test]
    fn above_last_point_clamps() {
        let curve = VolumeCurve::default();
        assert_eq!(curve.db_from_volume(101), 0.0);
        assert_eq!(curve.db_from_volume(i32::MAX), 0.0);
    }

    #[test]
    fn empty_curve_is_zero_db_except_silence() {
        let curve = VolumeCurve::new();
        assert!(curve.is_empty());
        assert_eq!(curve.db_from_volume(0), SILENCE_DB);
        assert_eq!(curve.db_from_volume(42), 0.0);
    }

    #[test]
    fn multi_segment_interpolation() {
        let curve = VolumeCurve::from_points(&[
            VolMapPoint::new(0, -60.0),
            VolMapPoint::new(50, -20.0),
            VolMapPoint::new(100, 0.0),
        ])
        .unwrap();
        assert!(approx(curve.db_from_volume(25), -40.0));
        assert!(approx(curve.db_from_volume(75), -10.0));
        assert!(approx(curve.db_from_volume(50), -20.0));
    }

    #[test]
    fn below_first_point_extends_first_segment() {
        let curve = VolumeCurve::from_points(&[VolMapPoint::new(10, -40.0), VolMapPoint::new(20, -30.0)]).unwrap();
        assert!(approx(curve.db_from_volume(5), -45.0));
    }

    #[test]
    fn zero_width_segment_yields_zero_db() {
        let curve = VolumeCurve::from_points(&[
            VolMapPoint::new(10, -40.0),
            VolMapPoint::new(10, -30.0),
            VolMapPoint::new(20, -10.0),
        ])
        .unwrap();
        assert_eq!(curve.db_from_volume(5), 0.0);
    }

    #[test]
    fn single_point_curve() {
        let curve = VolumeCurve::from_points(&[VolMapPoint::new(50, -6.0)]).unwrap();
        assert_eq!(curve.db_from_volume(60), -6.0);
        assert_eq!(curve.db_from_volume(10), 0.0);
    }

    #[test]
    fn oversized_curve_is_no_memory() {
        let points = [VolMapPoint::new(1, 0.0); MAX_CURVE_POINTS + 1];
        assert_eq!(VolumeCurve::from_points(&points), Err(CodecError::NoMemory));
        assert!(VolumeCurve::from_points(&points[..MAX_CURVE_POINTS]).is_ok());
    }

    const ASCENDING: VolRange = VolRange::new(VolMapPoint::new(0x00, -95.5), VolMapPoint::new(0xFF, 32.0));
    const INVERTED: VolRange = VolRange::new(VolMapPoint::new(0xFF, -127.5), VolMapPoint::new(0x00, 0.0));

    #[test]
    fn reg_from_db_clamps_and_interpolates() {
        assert_eq!(ASCENDING.reg_from_db(100.0), 0xFF);
        assert_eq!(ASCENDING.reg_from_db(-200.0), 0x00);
        assert_eq!(ASCENDING.reg_from_db(0.0), 191);
        assert_eq!(ASCENDING.reg_from_db(-0.3), 190);
    }

    #[test]
    fn reg_from_db_on_inverted_register_scale() {
        assert_eq!(INVERTED.reg_from_db(10.0), 0x00);
        assert_eq!(INVERTED.reg_from_db(-200.0), 0xFF);
        assert_eq!(INVERTED.reg_from_db(-64.0), 128);
    }

    #[test]
    fn db_from_reg_both_orientations() {
        assert_eq!(ASCENDING.db_from_reg(0x1FF), 32.0);
        assert_eq!(ASCENDING.db_from_reg(-1), -95.5);
        assert!(approx(ASCENDING.db_from_reg(191), 0.0));
        assert_eq!(INVERTED.db_from_reg(0x1FF), -127.5);
        assert_eq!(INVERTED.db_from_reg(-5), 0.0);
        assert!(approx(INVERTED.db_from_reg(128), -64.0));
    }

    #[test]
    fn degenerate_ranges_return_max() {
        let flat_db = VolRange::new(VolMapPoint::new(0, -10.0), VolMapPoint::new(100, -10.0));
        assert_eq!(flat_db.reg_from_db(-50.0), 100);
        let flat_reg = VolRange::new(VolMapPoint::new(7, -10.0), VolMapPoint::new(7, 5.0));
        assert_eq!(flat_reg.db_from_reg(0), 5.0);
    }
}
