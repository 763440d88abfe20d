//! Association policies: the gating rules that decide whether a report
//! could plausibly belong to a track, and how its kinematics feed the
//! filter.
//!
//! The manager core owns the generic drain/create/age/snapshot machinery
//! and delegates only this per-pair decision to a policy chosen at
//! construction: full-kinematic gates for air/gmti/rwr modes, angle-only
//! gates for IR-style sensors with no range.

use crate::track::Track;
use crate::types::{MergeStatus, Report, TrackType, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Nautical miles to meters.
const NM2M: f64 = 1852.0;

/// Gating/association strategy for one manager instance.
pub trait AssociationPolicy: Send + Sync {
    /// Policy name for logging.
    fn name(&self) -> &'static str;

    /// Type bits assigned to tracks created by this manager; also the
    /// compatibility filter for matching.
    fn track_type(&self) -> TrackType;

    /// Reports below this floor never create a track, even when unmatched.
    fn min_signal_to_noise_db(&self) -> f64;

    /// Whether the report should enter the queue at all. Angle-only
    /// managers discard returns merged out of a resolution cell.
    fn accepts(&self, _report: &Report) -> bool {
        true
    }

    /// Gate test for one (report, track) pair, with the track predicted
    /// `dt` seconds ahead. Returns the combined normalized error (lower is
    /// better) if every gate passes, `None` otherwise.
    fn gate(&self, report: &Report, track: &Track, dt: f64) -> Option<f64>;

    /// The (position, velocity) observation this policy feeds the filter.
    fn observed_kinematics(&self, report: &Report) -> (Vec3, Vec3) {
        (report.position, report.velocity)
    }
}

// ---------------------------------------------------------------------------
// Full-kinematic gates (air / gmti / rwr)
// ---------------------------------------------------------------------------

/// Independent thresholds on positional, range, and velocity error.
/// All three must pass (logical AND) for a candidate match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KinematicGates {
    pub track_type: TrackType,
    /// Positional error gate (meters).
    pub position_gate_m: f64,
    /// Range error gate (meters).
    pub range_gate_m: f64,
    /// Velocity error gate (m/s).
    pub velocity_gate_mps: f64,
    /// Minimum signal-to-noise for track creation (dB).
    pub min_signal_to_noise_db: f64,
    name: &'static str,
}

impl KinematicGates {
    /// A/A mode gates (TWS, ACM, SST).
    pub fn air() -> Self {
        Self {
            track_type: TrackType::AIR | TrackType::ONBOARD_SENSOR,
            position_gate_m: 2.0 * NM2M,
            range_gate_m: 500.0,
            velocity_gate_mps: 10.0,
            min_signal_to_noise_db: 0.0,
            name: "air",
        }
    }

    /// Ground moving target indication gates — wide position gate, no
    /// meaningful velocity discrimination at GMTI update rates.
    pub fn gmti() -> Self {
        Self {
            track_type: TrackType::GMTI | TrackType::ONBOARD_SENSOR,
            position_gate_m: 10.0 * NM2M,
            range_gate_m: 2000.0,
            velocity_gate_mps: 50.0,
            min_signal_to_noise_db: 0.0,
            name: "gmti",
        }
    }

    /// Radar warning receiver gates — emitter direction is coarse, so the
    /// gates are the widest of the three presets.
    pub fn rwr() -> Self {
        Self {
            track_type: TrackType::RWR | TrackType::ONBOARD_SENSOR,
            position_gate_m: 20.0 * NM2M,
            range_gate_m: 10.0 * NM2M,
            velocity_gate_mps: 300.0,
            min_signal_to_noise_db: 0.0,
            name: "rwr",
        }
    }
}

impl AssociationPolicy for KinematicGates {
    fn name(&self) -> &'static str {
        self.name
    }

    fn track_type(&self) -> TrackType {
        self.track_type
    }

    fn min_signal_to_noise_db(&self) -> f64 {
        self.min_signal_to_noise_db
    }

    fn gate(&self, report: &Report, track: &Track, dt: f64) -> Option<f64> {
        let predicted = track.predicted_position(dt);
        let pos_err = (report.position - predicted).norm();
        if pos_err >= self.position_gate_m {
            return None;
        }

        // Both ranges in the shared world frame. `report.range_m` is slant
        // range from the producing sensor and is not comparable to a
        // track's range unless that sensor sits at the origin.
        let range_err = (report.position.norm() - track.range()).abs();
        if range_err >= self.range_gate_m {
            return None;
        }

        let vel_err = (report.speed() - track.speed()).abs();
        if vel_err >= self.velocity_gate_mps {
            return None;
        }

        Some(
            pos_err / self.position_gate_m
                + range_err / self.range_gate_m
                + vel_err / self.velocity_gate_mps,
        )
    }
}

// ---------------------------------------------------------------------------
// Angle-only gates
// ---------------------------------------------------------------------------

/// Azimuth/elevation bin gating for sensors reporting no range.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AngleOnlyGates {
    pub track_type: TrackType,
    /// Azimuth bin half-width (radians).
    pub azimuth_bin_rad: f64,
    /// Elevation bin half-width (radians).
    pub elevation_bin_rad: f64,
    /// For a merged report: feed the perceived (fused centroid) position and
    /// velocity into the track when `true`; the single-target ground truth
    /// behind the fusion when `false`.
    pub use_perceived_pos_vel: bool,
    /// Minimum signal-to-noise for track creation (dB).
    pub min_signal_to_noise_db: f64,
}

impl Default for AngleOnlyGates {
    fn default() -> Self {
        Self {
            track_type: TrackType::AIR | TrackType::ONBOARD_SENSOR,
            azimuth_bin_rad: PI,
            elevation_bin_rad: PI,
            use_perceived_pos_vel: true,
            min_signal_to_noise_db: 0.0,
        }
    }
}

/// Wrap an angle difference into (-π, π].
fn wrap_angle(a: f64) -> f64 {
    (a + PI).rem_euclid(2.0 * PI) - PI
}

impl AssociationPolicy for AngleOnlyGates {
    fn name(&self) -> &'static str {
        "angle-only"
    }

    fn track_type(&self) -> TrackType {
        self.track_type
    }

    fn min_signal_to_noise_db(&self) -> f64 {
        self.min_signal_to_noise_db
    }

    fn accepts(&self, report: &Report) -> bool {
        report.merge_status != MergeStatus::MergedOut
    }

    fn gate(&self, report: &Report, track: &Track, _dt: f64) -> Option<f64> {
        let az_err = wrap_angle(report.azimuth_rad - track.azimuth_rad).abs();
        if az_err >= self.azimuth_bin_rad {
            return None;
        }
        let el_err = wrap_angle(report.elevation_rad - track.elevation_rad).abs();
        if el_err >= self.elevation_bin_rad {
            return None;
        }
        Some(az_err / self.azimuth_bin_rad + el_err / self.elevation_bin_rad)
    }

    fn observed_kinematics(&self, report: &Report) -> (Vec3, Vec3) {
        if report.merge_status == MergeStatus::Merged && !self.use_perceived_pos_vel {
            if let (Some(p), Some(v)) = (report.truth_position, report.truth_velocity) {
                return (p, v);
            }
        }
        (report.position, report.velocity)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use crate::types::{SensorId, TrackId};

    fn report(pos: Vec3, vel: Vec3) -> Report {
        let range = pos.norm();
        Report {
            sensor_id: SensorId(0),
            time: 0.0,
            signal_to_noise_db: 20.0,
            azimuth_rad: pos.y.atan2(pos.x),
            elevation_rad: 0.0,
            range_m: Some(range),
            position: pos,
            velocity: vel,
            acceleration: Vec3::zeros(),
            merge_status: MergeStatus::NotMerged,
            truth_position: None,
            truth_velocity: None,
        }
    }

    #[test]
    fn air_gate_accepts_nearby_report() {
        let policy = KinematicGates::air();
        let base = report(Vec3::new(10_000.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let track = Track::from_report(TrackId(1), policy.track_type(), &base);

        let close = report(Vec3::new(10_200.0, 0.0, 0.0), Vec3::new(205.0, 0.0, 0.0));
        assert!(policy.gate(&close, &track, 0.0).is_some());
    }

    #[test]
    fn air_gate_rejects_velocity_mismatch() {
        let policy = KinematicGates::air();
        let base = report(Vec3::new(10_000.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let track = Track::from_report(TrackId(1), policy.track_type(), &base);

        // Same place, wildly different speed — velocity gate must reject.
        let fast = report(Vec3::new(10_050.0, 0.0, 0.0), Vec3::new(400.0, 0.0, 0.0));
        assert!(policy.gate(&fast, &track, 0.0).is_none());
    }

    #[test]
    fn closer_report_scores_lower() {
        let policy = KinematicGates::air();
        let base = report(Vec3::new(10_000.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let track = Track::from_report(TrackId(1), policy.track_type(), &base);

        let near = report(Vec3::new(10_050.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let far = report(Vec3::new(10_400.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let s_near = policy.gate(&near, &track, 0.0).unwrap();
        let s_far = policy.gate(&far, &track, 0.0).unwrap();
        assert!(s_near < s_far);
    }

    #[test]
    fn range_gate_ignores_sensor_relative_slant_range() {
        // A sensor 50 km from the origin reports slant range 10 km for a
        // target 60 km out; the gate compares world-frame ranges only.
        let policy = KinematicGates::air();
        let base = report(Vec3::new(60_000.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        let track = Track::from_report(TrackId(1), policy.track_type(), &base);

        let mut update = report(Vec3::new(60_050.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        update.range_m = Some(10_050.0);
        assert!(policy.gate(&update, &track, 0.0).is_some());
    }

    #[test]
    fn angle_gate_wraps_azimuth() {
        let policy = AngleOnlyGates {
            azimuth_bin_rad: 0.2,
            elevation_bin_rad: 0.2,
            ..Default::default()
        };
        let mut base = report(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        base.azimuth_rad = PI - 0.05;
        let track = Track::from_report(TrackId(1), policy.track_type(), &base);

        // Just across the ±π seam — wrapped difference is 0.1 rad.
        let mut r = base.clone();
        r.azimuth_rad = -PI + 0.05;
        assert!(policy.gate(&r, &track, 0.0).is_some());
    }

    #[test]
    fn merged_report_kinematics_follow_policy_flag() {
        let perceived = Vec3::new(100.0, 100.0, 0.0);
        let truth = Vec3::new(90.0, 110.0, 0.0);
        let mut r = report(perceived, Vec3::zeros());
        r.merge_status = MergeStatus::Merged;
        r.truth_position = Some(truth);
        r.truth_velocity = Some(Vec3::new(1.0, 0.0, 0.0));

        let perceiving = AngleOnlyGates {
            use_perceived_pos_vel: true,
            ..Default::default()
        };
        assert_eq!(perceiving.observed_kinematics(&r).0, perceived);

        let truthful = AngleOnlyGates {
            use_perceived_pos_vel: false,
            ..Default::default()
        };
        assert_eq!(truthful.observed_kinematics(&r).0, truth);
    }
}
