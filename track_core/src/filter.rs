//! Alpha/beta/gamma predictive filter: fixed-gain smoothing of a track's
//! position/velocity/acceleration against a new observation.
//!
//! # Design choices
//! - Gains are fixed at configuration time, not adapted per update.
//! - `alpha = 1, beta = 0, gamma = 0` degenerates to full trust in the
//!   latest observation (filtered position == observed position).
//! - The gamma (acceleration) term is applied only when `gamma > 0`.

use crate::error::ConfigError;
use crate::track::Track;
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed filter gains. Validated on construction and on every change.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Gains {
    /// Position blend weight, `0..=1`.
    pub alpha: f64,
    /// Velocity correction weight, `>= 0`.
    pub beta: f64,
    /// Acceleration correction weight, `>= 0`.
    pub gamma: f64,
}

impl Default for Gains {
    fn default() -> Self {
        // Pure position follower.
        Self {
            alpha: 1.0,
            beta: 0.0,
            gamma: 0.0,
        }
    }
}

impl Gains {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self, ConfigError> {
        let g = Self { alpha, beta, gamma };
        g.validate()?;
        Ok(g)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) || !self.alpha.is_finite() {
            return Err(ConfigError::out_of_range("alpha", self.alpha, "[0, 1]"));
        }
        if self.beta < 0.0 || !self.beta.is_finite() {
            return Err(ConfigError::out_of_range("beta", self.beta, ">= 0"));
        }
        if self.gamma < 0.0 || !self.gamma.is_finite() {
            return Err(ConfigError::out_of_range("gamma", self.gamma, ">= 0"));
        }
        Ok(())
    }
}

/// Predict the track state forward by `dt`, then blend the observed
/// kinematics into it.
///
/// Residual `r = observed − predicted` drives the corrections:
/// `p = p̂ + α·r`,  `v = v̂ + (β/dt)·r`,  `a = â + (2γ/dt²)·r`.
pub fn smooth(track: &mut Track, observed_pos: Vec3, observed_vel: Vec3, gains: &Gains, dt: f64) {
    let dt = dt.max(1e-6); // degenerate frame interval still yields finite gains

    // Predict
    let predicted_pos = track.predicted_position(dt);
    let predicted_vel = track.velocity + track.acceleration * dt;

    // Correct
    let residual = observed_pos - predicted_pos;
    track.position = predicted_pos + residual * gains.alpha;
    if gains.beta > 0.0 {
        track.velocity = predicted_vel + residual * (gains.beta / dt);
    } else {
        // With no velocity gain, carry the observed velocity directly so the
        // next prediction still moves with the target.
        track.velocity = observed_vel;
    }
    if gains.gamma > 0.0 {
        track.acceleration += residual * (2.0 * gains.gamma / (dt * dt));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use crate::types::{MergeStatus, Report, SensorId, TrackId, TrackType};
    use approx::assert_abs_diff_eq;

    fn report_at(x: f64, t: f64) -> Report {
        Report {
            sensor_id: SensorId(0),
            time: t,
            signal_to_noise_db: 20.0,
            azimuth_rad: 0.0,
            elevation_rad: 0.0,
            range_m: Some(x),
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            merge_status: MergeStatus::NotMerged,
            truth_position: None,
            truth_velocity: None,
        }
    }

    #[test]
    fn alpha_one_tracks_observation_exactly() {
        let gains = Gains::default(); // alpha=1, beta=0, gamma=0
        let mut track = Track::from_report(TrackId(1), TrackType::AIR, &report_at(100.0, 0.0));

        let obs = report_at(110.0, 1.0);
        smooth(&mut track, obs.position, obs.velocity, &gains, 1.0);
        assert_abs_diff_eq!(track.position.x, 110.0, epsilon = 1e-9);
    }

    #[test]
    fn half_alpha_splits_residual() {
        let gains = Gains::new(0.5, 0.0, 0.0).unwrap();
        let mut track = Track::from_report(TrackId(1), TrackType::AIR, &report_at(100.0, 0.0));
        track.velocity = Vec3::zeros(); // predicted stays at 100

        smooth(&mut track, Vec3::new(110.0, 0.0, 0.0), Vec3::zeros(), &gains, 1.0);
        assert_abs_diff_eq!(track.position.x, 105.0, epsilon = 1e-9);
    }

    #[test]
    fn beta_corrects_velocity_from_residual() {
        let gains = Gains::new(1.0, 0.5, 0.0).unwrap();
        let mut track = Track::from_report(TrackId(1), TrackType::AIR, &report_at(0.0, 0.0));
        track.velocity = Vec3::zeros();

        // Target actually moved 10 m in 1 s — residual 10, beta/dt = 0.5
        smooth(&mut track, Vec3::new(10.0, 0.0, 0.0), Vec3::zeros(), &gains, 1.0);
        assert_abs_diff_eq!(track.velocity.x, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn bad_gains_rejected() {
        assert!(Gains::new(1.5, 0.0, 0.0).is_err());
        assert!(Gains::new(-0.1, 0.0, 0.0).is_err());
        assert!(Gains::new(1.0, -1.0, 0.0).is_err());
        assert!(Gains::new(1.0, 0.0, f64::NAN).is_err());
    }
}
