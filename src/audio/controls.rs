// Volume and mute control state
//
// The master volume is stored as a linear amplitude in [0, 1]. Two separate
// conversions exist and are kept apart on purpose:
//
// - the stored-value curve (logarithmic) backs the scalar/decibel values of
//   the control itself and validates Sets;
// - the taper curve (squared / square root) answers the standalone
//   ConvertScalarToDecibels / ConvertDecibelsToScalar queries.
//
// Hosts and clients already rely on both, so neither may be "fixed" into the
// other.

use serde::{Deserialize, Serialize};

pub const VOLUME_MIN_DB: f32 = -64.0;
pub const VOLUME_MAX_DB: f32 = 0.0;

/// Decibel span of the volume controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeCurve {
    pub min_db: f32,
    pub max_db: f32,
}

impl Default for VolumeCurve {
    fn default() -> Self {
        Self {
            min_db: VOLUME_MIN_DB,
            max_db: VOLUME_MAX_DB,
        }
    }
}

impl VolumeCurve {
    /// Stored amplitude to decibels; anything at or below the floor reads as MinDB
    pub fn to_decibel(&self, volume: f32) -> f32 {
        if volume <= 10.0f32.powf(self.min_db / 20.0) {
            self.min_db
        } else {
            20.0 * volume.log10()
        }
    }

    pub fn from_decibel(&self, decibel: f32) -> f32 {
        if decibel <= self.min_db {
            0.0
        } else {
            10.0f32.powf(decibel / 20.0)
        }
    }

    pub fn to_scalar(&self, volume: f32) -> f32 {
        let decibel = self.to_decibel(volume);
        (decibel - self.min_db) / (self.max_db - self.min_db)
    }

    pub fn from_scalar(&self, scalar: f32) -> f32 {
        let decibel = scalar * (self.max_db - self.min_db) + self.min_db;
        self.from_decibel(decibel)
    }

    /// Perceptual taper, scalar to decibels: clamp, square, map into the range
    pub fn taper_scalar_to_decibels(&self, scalar: f32) -> f32 {
        let s = scalar.clamp(0.0, 1.0);
        self.min_db + (s * s) * (self.max_db - self.min_db)
    }

    /// Inverse taper: clamp, normalise, square root
    pub fn taper_decibels_to_scalar(&self, decibel: f32) -> f32 {
        let d = decibel.clamp(self.min_db, self.max_db);
        ((d - self.min_db) / (self.max_db - self.min_db)).sqrt()
    }
}

/// Master volume and mute shared by the input and output control objects
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    volume: f32,
    muted: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl ControlState {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Store a new amplitude; returns true when the stored value changed.
    /// NaN is ignored and leaves the stored value as it was.
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if volume.is_nan() {
            return false;
        }
        let volume = volume.clamp(0.0, 1.0);
        if self.volume == volume {
            return false;
        }
        self.volume = volume;
        true
    }

    pub fn set_volume_scalar(&mut self, curve: &VolumeCurve, scalar: f32) -> bool {
        self.set_volume(curve.from_scalar(scalar))
    }

    pub fn set_volume_decibel(&mut self, curve: &VolumeCurve, decibel: f32) -> bool {
        let decibel = decibel.clamp(curve.min_db, curve.max_db);
        self.set_volume(curve.from_decibel(decibel))
    }

    pub fn set_muted(&mut self, muted: bool) -> bool {
        if self.muted == muted {
            return false;
        }
        self.muted = muted;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_silence_reads_as_min_db() {
        let curve = VolumeCurve::default();
        assert_eq!(curve.to_decibel(0.0), VOLUME_MIN_DB);
        assert_eq!(curve.to_scalar(0.0), 0.0);
        assert_eq!(curve.from_decibel(VOLUME_MIN_DB), 0.0);
    }

    #[test]
    fn test_unity_gain() {
        let curve = VolumeCurve::default();
        assert_eq!(curve.to_decibel(1.0), 0.0);
        assert_eq!(curve.to_scalar(1.0), 1.0);
        assert_eq!(curve.from_scalar(1.0), 1.0);
    }

    #[test]
    fn test_taper_curve_is_distinct_from_stored_curve() {
        let curve = VolumeCurve::default();
        // Taper: 0.5 squared is 0.25 of the span above MinDB
        assert_eq!(curve.taper_scalar_to_decibels(0.5), -48.0);
        // Stored curve: scalar 0.5 is the midpoint of the decibel span
        assert!((curve.to_decibel(curve.from_scalar(0.5)) - (-32.0)).abs() < 1e-4);
    }

    #[test]
    fn test_taper_clamps_inputs() {
        let curve = VolumeCurve::default();
        assert_eq!(curve.taper_scalar_to_decibels(-3.0), VOLUME_MIN_DB);
        assert_eq!(curve.taper_scalar_to_decibels(7.0), VOLUME_MAX_DB);
        assert_eq!(curve.taper_decibels_to_scalar(-200.0), 0.0);
        assert_eq!(curve.taper_decibels_to_scalar(12.0), 1.0);
        assert!((curve.taper_decibels_to_scalar(-48.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_control_state_reports_changes_only() {
        let curve = VolumeCurve::default();
        let mut controls = ControlState::default();

        assert!(!controls.set_volume(1.0));
        assert!(controls.set_volume_scalar(&curve, 0.5));
        assert!(!controls.set_volume_scalar(&curve, 0.5));
        assert!(controls.set_volume_decibel(&curve, -100.0));
        assert_eq!(controls.volume(), 0.0);

        assert!(controls.set_muted(true));
        assert!(!controls.set_muted(true));
    }

    #[test]
    fn test_non_finite_volume_never_stored() {
        let curve = VolumeCurve::default();
        let mut controls = ControlState::default();
        controls.set_volume(0.25);

        assert!(!controls.set_volume(f32::NAN));
        assert!(!controls.set_volume_scalar(&curve, f32::NAN));
        assert!(!controls.set_volume_decibel(&curve, f32::NAN));
        assert_eq!(controls.volume(), 0.25);

        // Infinities saturate at the ends of the range
        assert!(controls.set_volume_scalar(&curve, f32::INFINITY));
        assert_eq!(controls.volume(), 1.0);
        assert!(controls.set_volume_decibel(&curve, f32::NEG_INFINITY));
        assert_eq!(controls.volume(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_scalar_round_trip(volume in 0.001f32..=1.0f32) {
            let curve = VolumeCurve::default();
            let back = curve.from_scalar(curve.to_scalar(volume));
            prop_assert!((back - volume).abs() <= 1e-4 * volume.max(1e-3) + 1e-6,
                "volume {} came back as {}", volume, back);
        }

        #[test]
        fn prop_stored_volume_stays_in_unit_range(
            scalar in prop_oneof![
                -5.0f32..5.0f32,
                Just(f32::NAN),
                Just(f32::INFINITY),
                Just(f32::NEG_INFINITY)
            ],
            db in prop_oneof![
                -500.0f32..500.0f32,
                Just(f32::NAN),
                Just(f32::INFINITY),
                Just(f32::NEG_INFINITY)
            ]
        ) {
            let curve = VolumeCurve::default();
            let mut controls = ControlState::default();
            controls.set_volume_scalar(&curve, scalar);
            prop_assert!((0.0..=1.0).contains(&controls.volume()));
            controls.set_volume_decibel(&curve, db);
            prop_assert!((0.0..=1.0).contains(&controls.volume()));
        }
    }
}
