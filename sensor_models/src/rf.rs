//! RF sensor: full-kinematic reports with a range-law SNR.
//!
//! Each scan tests every contact against detection range and probability,
//! perturbs range and bearing with measurement noise, and stamps the
//! report with an SNR that falls off as the fourth power of range
//! (40·log10 in dB terms).

use crate::contact::Contact;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use track_core::types::{MergeStatus, Report, SensorId, Vec3};

/// Physical configuration of an RF sensor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RfSensorParams {
    /// Sensor position in world coordinates (meters)
    pub position: Vec3,
    /// Maximum detection range (meters)
    pub max_range_m: f64,
    /// Probability of detection per contact per scan
    pub p_detection: f64,
    /// Range at which the SNR equals `reference_sn_db` (meters)
    pub reference_range_m: f64,
    /// SNR at the reference range (dB)
    pub reference_sn_db: f64,
    /// Measurement noise: range standard deviation (meters)
    pub range_noise_std_m: f64,
    /// Measurement noise: azimuth/elevation standard deviation (radians)
    pub angle_noise_std_rad: f64,
    /// Measurement noise: per-axis velocity standard deviation (m/s)
    pub velocity_noise_std_mps: f64,
}

impl Default for RfSensorParams {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            max_range_m: 100_000.0, // 100 km
            p_detection: 0.9,
            reference_range_m: 10_000.0,
            reference_sn_db: 40.0,
            range_noise_std_m: 50.0,
            angle_noise_std_rad: 0.01, // ~0.6°
            velocity_noise_std_mps: 5.0,
        }
    }
}

/// One simulated RF sensor with its own seeded noise stream.
pub struct RfSensor {
    pub id: SensorId,
    pub params: RfSensorParams,
    rng: ChaCha8Rng,
}

impl RfSensor {
    pub fn new(id: SensorId, params: RfSensorParams, seed: u64) -> Self {
        Self {
            id,
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// SNR for a target at `range_m`, fourth-power range law.
    pub fn signal_to_noise_db(&self, range_m: f64) -> f64 {
        let r = range_m.max(1.0);
        self.params.reference_sn_db - 40.0 * (r / self.params.reference_range_m).log10()
    }

    /// Produce one scan's worth of reports at simulation time `time`.
    pub fn scan(&mut self, contacts: &[Contact], time: f64) -> Vec<Report> {
        let mut reports = Vec::new();

        for contact in contacts {
            let rel = contact.position - self.params.position;
            let range = rel.norm();
            if range > self.params.max_range_m {
                continue;
            }
            // Miss detection?
            if self.rng.gen::<f64>() > self.params.p_detection {
                continue;
            }

            let azimuth = rel.y.atan2(rel.x);
            let horiz = (rel.x * rel.x + rel.y * rel.y).sqrt();
            let elevation = rel.z.atan2(horiz);

            let noisy_range = range + self.noise(self.params.range_noise_std_m);
            let noisy_az = azimuth + self.noise(self.params.angle_noise_std_rad);
            let noisy_el = elevation + self.noise(self.params.angle_noise_std_rad);

            // Rebuild cartesian position from the perturbed polar return
            let cos_el = noisy_el.cos();
            let position = self.params.position
                + Vec3::new(
                    noisy_range * cos_el * noisy_az.cos(),
                    noisy_range * cos_el * noisy_az.sin(),
                    noisy_range * noisy_el.sin(),
                );
            let velocity = Vec3::new(
                contact.velocity.x + self.noise(self.params.velocity_noise_std_mps),
                contact.velocity.y + self.noise(self.params.velocity_noise_std_mps),
                contact.velocity.z + self.noise(self.params.velocity_noise_std_mps),
            );

            reports.push(Report {
                sensor_id: self.id,
                time,
                signal_to_noise_db: self.signal_to_noise_db(range),
                azimuth_rad: noisy_az,
                elevation_rad: noisy_el,
                range_m: Some(noisy_range),
                position,
                velocity,
                acceleration: Vec3::zeros(),
                merge_status: MergeStatus::NotMerged,
                truth_position: Some(contact.position),
                truth_velocity: Some(contact.velocity),
            });
        }

        reports
    }

    fn noise(&mut self, std: f64) -> f64 {
        self.rng.gen::<f64>() * std * 2.0 - std
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_at(x: f64) -> Contact {
        Contact::new(1, Vec3::new(x, 0.0, 0.0), Vec3::new(100.0, 0.0, 0.0))
    }

    fn certain_params() -> RfSensorParams {
        RfSensorParams {
            p_detection: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn detects_in_range_contact() {
        let mut sensor = RfSensor::new(SensorId(1), certain_params(), 7);
        let reports = sensor.scan(&[contact_at(10_000.0)], 0.0);
        assert_eq!(reports.len(), 1);
        let r = &reports[0];
        assert!(r.validate().is_ok());
        assert!((r.position.x - 10_000.0).abs() < 300.0);
        assert_eq!(r.merge_status, MergeStatus::NotMerged);
        assert!(r.range_m.is_some());
    }

    #[test]
    fn ignores_out_of_range_contact() {
        let mut sensor = RfSensor::new(SensorId(1), certain_params(), 7);
        let reports = sensor.scan(&[contact_at(200_000.0)], 0.0);
        assert!(reports.is_empty());
    }

    #[test]
    fn snr_falls_off_with_range() {
        let sensor = RfSensor::new(SensorId(1), certain_params(), 7);
        let near = sensor.signal_to_noise_db(10_000.0);
        let far = sensor.signal_to_noise_db(20_000.0);
        assert!((near - 40.0).abs() < 1e-9);
        // Doubling range costs 12 dB on a fourth-power law
        assert!((near - far - 12.04).abs() < 0.01);
    }
}
