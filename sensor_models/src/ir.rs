//! IR sensor: angle-only reports with resolution-cell merging.
//!
//! An IR seeker resolves targets in angle only. Contacts that fall inside
//! the same angular resolution cell produce a single return: the strongest
//! contact anchors the cell, the report carries the centroid of every
//! member's perceived kinematics and is tagged [`MergeStatus::Merged`],
//! and each absorbed member additionally yields a
//! [`MergeStatus::MergedOut`] report so downstream consumers can account
//! for the lost contact. Ground truth of the anchor rides along on the
//! merged report for consumers configured to prefer it.

use crate::contact::Contact;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use track_core::types::{MergeStatus, Report, SensorId, Vec3};

/// Physical configuration of an IR sensor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrSensorParams {
    /// Sensor position in world coordinates (meters)
    pub position: Vec3,
    /// Maximum detection range (meters)
    pub max_range_m: f64,
    /// Probability of detection per contact per scan
    pub p_detection: f64,
    /// Angular resolution cell half-width (radians); contacts within this
    /// of the cell anchor in both azimuth and elevation merge
    pub resolution_rad: f64,
    /// Measurement noise: azimuth/elevation standard deviation (radians)
    pub angle_noise_std_rad: f64,
    /// Range at which the SNR equals `reference_sn_db` (meters)
    pub reference_range_m: f64,
    /// SNR at the reference range (dB)
    pub reference_sn_db: f64,
}

impl Default for IrSensorParams {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            max_range_m: 50_000.0, // 50 km
            p_detection: 0.95,
            resolution_rad: 0.02, // ~1.1°
            angle_noise_std_rad: 0.002,
            reference_range_m: 10_000.0,
            reference_sn_db: 30.0,
        }
    }
}

/// One simulated IR sensor with its own seeded noise stream.
pub struct IrSensor {
    pub id: SensorId,
    pub params: IrSensorParams,
    rng: ChaCha8Rng,
}

/// A detected contact with its line-of-sight geometry, pre-merge.
struct Detection<'a> {
    contact: &'a Contact,
    azimuth: f64,
    elevation: f64,
    sn_db: f64,
}

impl IrSensor {
    pub fn new(id: SensorId, params: IrSensorParams, seed: u64) -> Self {
        Self {
            id,
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// SNR for a target at `range_m`, second-power range law (passive IR).
    pub fn signal_to_noise_db(&self, range_m: f64) -> f64 {
        let r = range_m.max(1.0);
        self.params.reference_sn_db - 20.0 * (r / self.params.reference_range_m).log10()
    }

    /// Produce one scan's worth of angle-only reports at time `time`.
    pub fn scan(&mut self, contacts: &[Contact], time: f64) -> Vec<Report> {
        let mut detections: Vec<Detection<'_>> = Vec::new();
        for contact in contacts {
            let rel = contact.position - self.params.position;
            let range = rel.norm();
            if range > self.params.max_range_m {
                continue;
            }
            if self.rng.gen::<f64>() > self.params.p_detection {
                continue;
            }
            let horiz = (rel.x * rel.x + rel.y * rel.y).sqrt();
            detections.push(Detection {
                contact,
                azimuth: rel.y.atan2(rel.x),
                elevation: rel.z.atan2(horiz),
                sn_db: self.signal_to_noise_db(range),
            });
        }

        // Strongest detection anchors each resolution cell
        detections.sort_by(|a, b| b.sn_db.total_cmp(&a.sn_db));

        let mut reports = Vec::new();
        let mut claimed = vec![false; detections.len()];

        for i in 0..detections.len() {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;
            let anchor = &detections[i];

            let mut members = vec![i];
            for (j, det) in detections.iter().enumerate().skip(i + 1) {
                if claimed[j] {
                    continue;
                }
                if angle_diff(det.azimuth, anchor.azimuth).abs() <= self.params.resolution_rad
                    && (det.elevation - anchor.elevation).abs() <= self.params.resolution_rad
                {
                    claimed[j] = true;
                    members.push(j);
                }
            }

            if members.len() == 1 {
                let az = anchor.azimuth + self.noise();
                let el = anchor.elevation + self.noise();
                reports.push(self.report(
                    time,
                    az,
                    el,
                    anchor.sn_db,
                    anchor.contact.position,
                    anchor.contact.velocity,
                    anchor.contact,
                    MergeStatus::NotMerged,
                ));
                continue;
            }

            // Perceived kinematics of a merged return is the centroid of
            // its members; truth stays the anchor's.
            let n = members.len() as f64;
            let centroid_pos = members
                .iter()
                .map(|&j| detections[j].contact.position)
                .sum::<Vec3>()
                / n;
            let centroid_vel = members
                .iter()
                .map(|&j| detections[j].contact.velocity)
                .sum::<Vec3>()
                / n;
            let rel = centroid_pos - self.params.position;
            let horiz = (rel.x * rel.x + rel.y * rel.y).sqrt();
            let az = rel.y.atan2(rel.x) + self.noise();
            let el = rel.z.atan2(horiz) + self.noise();

            reports.push(self.report(
                time,
                az,
                el,
                anchor.sn_db,
                centroid_pos,
                centroid_vel,
                anchor.contact,
                MergeStatus::Merged,
            ));
            for &j in &members[1..] {
                let det = &detections[j];
                reports.push(self.report(
                    time,
                    det.azimuth,
                    det.elevation,
                    det.sn_db,
                    det.contact.position,
                    det.contact.velocity,
                    det.contact,
                    MergeStatus::MergedOut,
                ));
            }
        }

        reports
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        time: f64,
        azimuth_rad: f64,
        elevation_rad: f64,
        sn_db: f64,
        position: Vec3,
        velocity: Vec3,
        truth: &Contact,
        merge_status: MergeStatus,
    ) -> Report {
        Report {
            sensor_id: self.id,
            time,
            signal_to_noise_db: sn_db,
            azimuth_rad,
            elevation_rad,
            range_m: None, // angle-only
            position,
            velocity,
            acceleration: Vec3::zeros(),
            merge_status,
            truth_position: Some(truth.position),
            truth_velocity: Some(truth.velocity),
        }
    }

    fn noise(&mut self) -> f64 {
        let std = self.params.angle_noise_std_rad;
        self.rng.gen::<f64>() * std * 2.0 - std
    }
}

/// Signed smallest difference between two angles (radians).
fn angle_diff(a: f64, b: f64) -> f64 {
    (a - b + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certain_params() -> IrSensorParams {
        IrSensorParams {
            p_detection: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn separated_contacts_stay_unmerged() {
        let mut sensor = IrSensor::new(SensorId(2), certain_params(), 11);
        let contacts = [
            Contact::new(1, Vec3::new(10_000.0, 0.0, 0.0), Vec3::zeros()),
            Contact::new(2, Vec3::new(0.0, 10_000.0, 0.0), Vec3::zeros()),
        ];
        let reports = sensor.scan(&contacts, 0.0);
        assert_eq!(reports.len(), 2);
        assert!(reports
            .iter()
            .all(|r| r.merge_status == MergeStatus::NotMerged));
        assert!(reports.iter().all(|r| r.range_m.is_none()));
    }

    #[test]
    fn close_contacts_merge_into_centroid() {
        let mut sensor = IrSensor::new(SensorId(2), certain_params(), 11);
        // ~0.005 rad apart at 10 km, well inside the 0.02 rad cell
        let contacts = [
            Contact::new(1, Vec3::new(10_000.0, 0.0, 0.0), Vec3::new(100.0, 0.0, 0.0)),
            Contact::new(2, Vec3::new(10_000.0, 50.0, 0.0), Vec3::new(100.0, 0.0, 0.0)),
        ];
        let reports = sensor.scan(&contacts, 0.0);

        let merged: Vec<_> = reports
            .iter()
            .filter(|r| r.merge_status == MergeStatus::Merged)
            .collect();
        let merged_out: Vec<_> = reports
            .iter()
            .filter(|r| r.merge_status == MergeStatus::MergedOut)
            .collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged_out.len(), 1);

        // Perceived position is the centroid, truth is a single member
        let m = merged[0];
        assert!((m.position.y - 25.0).abs() < 1e-9);
        let truth = m.truth_position.unwrap();
        assert!(truth.y.abs() < 1e-9 || (truth.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn angle_diff_wraps() {
        let d = angle_diff(std::f64::consts::PI - 0.01, -std::f64::consts::PI + 0.01);
        assert!(d.abs() < 0.03);
    }
}
