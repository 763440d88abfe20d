//! Ground-truth input to the sensor models.

use serde::{Deserialize, Serialize};
use track_core::types::Vec3;

/// True state of one observable object at scan time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    /// Ground-truth target ID (simulation bookkeeping, never visible to
    /// the track managers)
    pub target_id: u64,
    /// True position in world coordinates (meters)
    pub position: Vec3,
    /// True velocity (m/s)
    pub velocity: Vec3,
}

impl Contact {
    pub fn new(target_id: u64, position: Vec3, velocity: Vec3) -> Self {
        Self {
            target_id,
            position,
            velocity,
        }
    }
}
