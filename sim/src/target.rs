//! Ground-truth targets.
//!
//! Targets fly straight lines; the interesting dynamics live in the
//! sensors and the correlation cycle, not the trajectories.

use sensor_models::Contact;
use serde::{Deserialize, Serialize};
use track_core::types::Vec3;

/// A simulated target with ground-truth linear motion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Target {
    /// Ground-truth ID (simulation bookkeeping only)
    pub id: u64,
    /// True position (meters)
    pub position: Vec3,
    /// True velocity (m/s)
    pub velocity: Vec3,
    /// Target appears after this time (no detections before)
    pub appear_at: Option<f64>,
    /// Target disappears after this time
    pub disappear_at: Option<f64>,
}

impl Target {
    pub fn new(id: u64, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            appear_at: None,
            disappear_at: None,
        }
    }

    /// Propagate the true state by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// True if the target is observable at time `t`.
    pub fn is_active(&self, t: f64) -> bool {
        if let Some(appear) = self.appear_at {
            if t < appear {
                return false;
            }
        }
        if let Some(disappear) = self.disappear_at {
            if t >= disappear {
                return false;
            }
        }
        true
    }

    pub fn contact(&self) -> Contact {
        Contact::new(self.id, self.position, self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_linear() {
        let mut t = Target::new(0, Vec3::new(0.0, 0.0, 0.0), Vec3::new(100.0, -50.0, 0.0));
        t.step(2.0);
        assert_eq!(t.position, Vec3::new(200.0, -100.0, 0.0));
    }

    #[test]
    fn activity_window() {
        let mut t = Target::new(0, Vec3::zeros(), Vec3::zeros());
        t.appear_at = Some(5.0);
        t.disappear_at = Some(10.0);
        assert!(!t.is_active(4.9));
        assert!(t.is_active(5.0));
        assert!(!t.is_active(10.0));
    }
}
