//! Track: the system's persistent belief about one real-world target.

use crate::types::{MergeStatus, Report, TrackId, TrackType, Vec3};
use serde::{Deserialize, Serialize};

/// Mutable state of one tracked target.
///
/// Lives in a slot of the manager's fixed-capacity table; readers only ever
/// see snapshot copies. The numeric ID is assigned once at creation and is
/// never reused, even after the slot is freed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    /// Unique monotonic identifier.
    pub id: TrackId,
    /// Category bit-mask (air/gmti/rwr/..., OR-combinable).
    pub track_type: TrackType,
    /// Filtered position estimate (local frame, meters).
    pub position: Vec3,
    /// Filtered velocity estimate (m/s).
    pub velocity: Vec3,
    /// Filtered acceleration estimate (m/s²); zero unless gamma > 0.
    pub acceleration: Vec3,
    /// Seconds since the last updating report. Reset to 0 exactly when the
    /// track is matched in a cycle.
    pub age: f64,
    /// Signal-to-noise of the last matched report (dB).
    pub signal_to_noise_db: f64,
    /// Last observed azimuth (radians) — angle-only managers.
    pub azimuth_rad: f64,
    /// Last observed elevation (radians) — angle-only managers.
    pub elevation_rad: f64,
    /// Merge tag carried over from the last matched report.
    pub merge_status: MergeStatus,
    /// Simulation time of the last update.
    pub last_updated: f64,
    /// The report that last updated this track.
    pub last_report: Option<Report>,
}

impl Track {
    /// Seed a new track from an unmatched report.
    pub fn from_report(id: TrackId, track_type: TrackType, report: &Report) -> Self {
        Self {
            id,
            track_type,
            position: report.position,
            velocity: report.velocity,
            acceleration: report.acceleration,
            age: 0.0,
            signal_to_noise_db: report.signal_to_noise_db,
            azimuth_rad: report.azimuth_rad,
            elevation_rad: report.elevation_rad,
            merge_status: report.merge_status,
            last_updated: report.time,
            last_report: Some(report.clone()),
        }
    }

    /// Position extrapolated `dt` seconds ahead of the current estimate.
    pub fn predicted_position(&self, dt: f64) -> Vec3 {
        self.position + self.velocity * dt + self.acceleration * (0.5 * dt * dt)
    }

    /// Ground speed of the current estimate (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Slant range of the current estimate from the origin (meters).
    pub fn range(&self) -> f64 {
        self.position.norm()
    }

    /// Record a matched report on the track (caller runs the filter first).
    pub fn note_match(&mut self, report: &Report) {
        self.age = 0.0;
        self.signal_to_noise_db = report.signal_to_noise_db;
        self.azimuth_rad = report.azimuth_rad;
        self.elevation_rad = report.elevation_rad;
        self.merge_status = report.merge_status;
        self.last_updated = report.time;
        self.last_report = Some(report.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
