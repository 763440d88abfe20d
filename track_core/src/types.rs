//! Fundamental types used across the entire workspace.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scalar type: f64 throughout for numerical consistency in the filter.
// ---------------------------------------------------------------------------

/// 3D position/velocity/acceleration vector in the local simulation frame
/// (meters, meters/second, meters/second²).
pub type Vec3 = Vector3<f64>;

// ---------------------------------------------------------------------------
// Identifier types — newtype wrappers so IDs are never confused at compile time
// ---------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TrackId(pub u64);

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SensorId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Track type bits
// ---------------------------------------------------------------------------

/// Category bit-mask for tracks and track managers.
///
/// A manager only considers reports against tracks whose mask intersects its
/// own configured type, so multiple managers can coexist, each correlating
/// only its own report category.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TrackType(pub u16);

impl TrackType {
    /// Air target track (A/A modes).
    pub const AIR: TrackType = TrackType(0x0001);
    /// Ground moving target indication track.
    pub const GMTI: TrackType = TrackType(0x0002);
    /// Radar warning receiver track.
    pub const RWR: TrackType = TrackType(0x0004);
    /// Track that a weapon may be assigned against.
    pub const RAYGUN: TrackType = TrackType(0x0008);
    /// Track originated by an onboard sensor.
    pub const ONBOARD_SENSOR: TrackType = TrackType(0x0100);
    /// Track received over a datalink.
    pub const DATALINK: TrackType = TrackType(0x0200);

    /// Bit-wise OR of two masks.
    pub const fn union(self, other: TrackType) -> TrackType {
        TrackType(self.0 | other.0)
    }

    /// True if any bit is shared between the two masks.
    pub const fn intersects(self, other: TrackType) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for TrackType {
    type Output = TrackType;
    fn bitor(self, rhs: TrackType) -> TrackType {
        self.union(rhs)
    }
}

// ---------------------------------------------------------------------------
// Merge status
// ---------------------------------------------------------------------------

/// Whether a report was fused upstream from multiple closely-spaced targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStatus {
    /// Plain single-target detection.
    #[default]
    NotMerged,
    /// Centroid report fused from two or more targets.
    Merged,
    /// A target that was absorbed into another report's centroid.
    MergedOut,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One sensor detection event submitted for track correlation.
///
/// Immutable once produced; the sensor model pushes it (with its
/// signal-to-noise value) into the manager's bounded queue and the manager
/// consumes it exactly once in the next `process` cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    /// Which sensor produced this report.
    pub sensor_id: SensorId,
    /// Detection time in simulation seconds.
    pub time: f64,
    /// Signal-to-noise ratio of the detection (dB).
    pub signal_to_noise_db: f64,
    /// Angle of arrival: azimuth (radians, body frame).
    pub azimuth_rad: f64,
    /// Angle of arrival: elevation (radians, body frame).
    pub elevation_rad: f64,
    /// Slant range (meters); `None` for angle-only sensors.
    pub range_m: Option<f64>,
    /// Estimated target position in the local frame.
    pub position: Vec3,
    /// Estimated target velocity in the local frame.
    pub velocity: Vec3,
    /// Estimated target acceleration in the local frame.
    pub acceleration: Vec3,
    /// Upstream fusion tag (angle-only sensors may merge close targets).
    pub merge_status: MergeStatus,
    /// Ground-truth position of one constituent target behind a fused
    /// detection. `None` unless the producing sensor merged targets.
    pub truth_position: Option<Vec3>,
    /// Ground-truth velocity matching `truth_position`.
    pub truth_velocity: Option<Vec3>,
}

impl Report {
    /// Reject reports carrying non-finite kinematics or angles.
    ///
    /// A malformed report is skipped (and logged) by the manager rather than
    /// aborting the cycle.
    pub fn validate(&self) -> Result<(), crate::error::ReportError> {
        let finite_vec = |v: &Vec3| v.iter().all(|x| x.is_finite());
        if !finite_vec(&self.position) || !finite_vec(&self.velocity) || !finite_vec(&self.acceleration)
        {
            return Err(crate::error::ReportError::NonFiniteKinematics);
        }
        if !self.azimuth_rad.is_finite() || !self.elevation_rad.is_finite() {
            return Err(crate::error::ReportError::NonFiniteAngles);
        }
        if let Some(r) = self.range_m {
            if !r.is_finite() || r < 0.0 {
                return Err(crate::error::ReportError::BadRange(r));
            }
        }
        if !self.signal_to_noise_db.is_finite() {
            return Err(crate::error::ReportError::NonFiniteSignal);
        }
        if let Some(tp) = &self.truth_position {
            if !finite_vec(tp) {
                return Err(crate::error::ReportError::NonFiniteKinematics);
            }
        }
        Ok(())
    }

    /// Ground speed of the kinematic estimate (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_report() -> Report {
        Report {
            sensor_id: SensorId(1),
            time: 0.0,
            signal_to_noise_db: 20.0,
            azimuth_rad: 0.1,
            elevation_rad: 0.0,
            range_m: Some(5000.0),
            position: Vec3::new(5000.0, 0.0, 0.0),
            velocity: Vec3::new(-100.0, 0.0, 0.0),
            acceleration: Vec3::zeros(),
            merge_status: MergeStatus::NotMerged,
            truth_position: None,
            truth_velocity: None,
        }
    }

    #[test]
    fn type_bits_combine_and_intersect() {
        let mgr_type = TrackType::AIR | TrackType::ONBOARD_SENSOR;
        assert!(mgr_type.intersects(TrackType::AIR));
        assert!(!mgr_type.intersects(TrackType::RWR));
        assert!(!TrackType::default().intersects(mgr_type));
    }

    #[test]
    fn valid_report_passes() {
        assert!(base_report().validate().is_ok());
    }

    #[test]
    fn non_finite_position_rejected() {
        let mut r = base_report();
        r.position.x = f64::NAN;
        assert!(r.validate().is_err());
    }

    #[test]
    fn negative_range_rejected() {
        let mut r = base_report();
        r.range_m = Some(-1.0);
        assert!(r.validate().is_err());
    }
}
