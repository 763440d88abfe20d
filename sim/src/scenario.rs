//! Scenario definitions.
//!
//! Each scenario is a named configuration of targets and sensor→manager
//! channels. All scenarios are deterministic given the same seed.

use crate::target::Target;
use sensor_models::{IrSensorParams, RfSensorParams};
use serde::{Deserialize, Serialize};
use track_core::policy::AngleOnlyGates;
use track_core::types::Vec3;
use track_core::TrackManagerConfig;

/// Which pre-defined scenario to load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// 4 aircraft on straight tracks, one RF sensor, air manager
    Patrol,
    /// 12 slow ground movers, one RF sensor, GMTI manager
    Convoy,
    /// Close formation pair plus two separated targets, IR sensor,
    /// angle-only manager (exercises resolution-cell merging)
    IrFormation,
    /// 300 aircraft — scalability stress on the correlation cycle
    Stress,
}

/// The sensor half of a channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SensorSpec {
    Rf(RfSensorParams),
    Ir(IrSensorParams),
}

/// The manager half of a channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ManagerSpec {
    Air,
    Gmti,
    Rwr,
    AngleOnly(AngleOnlyGates),
}

/// One sensor feeding one track manager.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub sensor: SensorSpec,
    pub manager: ManagerSpec,
    pub config: TrackManagerConfig,
}

/// A fully configured simulation scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub duration_s: f64,
    pub frame_dt: f64,
    pub targets: Vec<Target>,
    pub channels: Vec<ChannelSpec>,
}

impl Scenario {
    pub fn build(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Patrol => Self::patrol(),
            ScenarioKind::Convoy => Self::convoy(),
            ScenarioKind::IrFormation => Self::ir_formation(),
            ScenarioKind::Stress => Self::stress(),
        }
    }

    // -----------------------------------------------------------------------
    // Patrol: a handful of airliners, one radar, air manager
    // -----------------------------------------------------------------------
    fn patrol() -> Self {
        let targets = vec![
            Target::new(0, Vec3::new(-20_000.0, 0.0, 8_000.0), Vec3::new(150.0, 0.0, 0.0)),
            Target::new(1, Vec3::new(0.0, -20_000.0, 9_000.0), Vec3::new(0.0, 150.0, 0.0)),
            Target::new(2, Vec3::new(10_000.0, 10_000.0, 7_000.0), Vec3::new(-80.0, -80.0, 0.0)),
            Target::new(3, Vec3::new(-5_000.0, 15_000.0, 10_000.0), Vec3::new(100.0, -50.0, 0.0)),
        ];

        Self {
            name: "patrol".into(),
            duration_s: 60.0,
            frame_dt: 0.1,
            targets,
            channels: vec![ChannelSpec {
                // Velocity noise kept well inside the air manager's
                // 10 m/s gate so clean tracks stay continuous.
                sensor: SensorSpec::Rf(RfSensorParams {
                    velocity_noise_std_mps: 2.0,
                    ..Default::default()
                }),
                manager: ManagerSpec::Air,
                config: TrackManagerConfig::default(),
            }],
        }
    }

    // -----------------------------------------------------------------------
    // Convoy: slow ground movers, GMTI manager with its wider gates
    // -----------------------------------------------------------------------
    fn convoy() -> Self {
        let mut targets = Vec::new();
        for i in 0..12u64 {
            // Column of vehicles 200 m apart doing 15 m/s
            targets.push(Target::new(
                i,
                Vec3::new(-10_000.0 + i as f64 * 200.0, 5_000.0, 0.0),
                Vec3::new(15.0, 0.0, 0.0),
            ));
        }

        Self {
            name: "convoy".into(),
            duration_s: 120.0,
            frame_dt: 0.5,
            targets,
            channels: vec![ChannelSpec {
                sensor: SensorSpec::Rf(RfSensorParams {
                    velocity_noise_std_mps: 2.0,
                    ..Default::default()
                }),
                manager: ManagerSpec::Gmti,
                config: TrackManagerConfig::default(),
            }],
        }
    }

    // -----------------------------------------------------------------------
    // IrFormation: a tight pair that merges in the IR resolution cell
    // -----------------------------------------------------------------------
    fn ir_formation() -> Self {
        let targets = vec![
            // Formation pair, 60 m apart at 15 km: ~4 mrad, inside the cell
            Target::new(0, Vec3::new(15_000.0, 0.0, 6_000.0), Vec3::new(-200.0, 0.0, 0.0)),
            Target::new(1, Vec3::new(15_000.0, 60.0, 6_000.0), Vec3::new(-200.0, 0.0, 0.0)),
            // Well separated singletons
            Target::new(2, Vec3::new(0.0, 18_000.0, 5_000.0), Vec3::new(0.0, -180.0, 0.0)),
            Target::new(3, Vec3::new(-12_000.0, -12_000.0, 4_000.0), Vec3::new(120.0, 120.0, 0.0)),
        ];

        Self {
            name: "ir_formation".into(),
            duration_s: 30.0,
            frame_dt: 0.1,
            targets,
            channels: vec![ChannelSpec {
                sensor: SensorSpec::Ir(IrSensorParams::default()),
                manager: ManagerSpec::AngleOnly(AngleOnlyGates::default()),
                config: TrackManagerConfig::default(),
            }],
        }
    }

    // -----------------------------------------------------------------------
    // Stress: many targets on a ring, large table
    // -----------------------------------------------------------------------
    fn stress() -> Self {
        let n = 300u64;
        let mut targets = Vec::new();
        for i in 0..n {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            let r = 60_000.0;
            targets.push(Target::new(
                i,
                Vec3::new(r * angle.cos(), r * angle.sin(), 8_000.0),
                Vec3::new(-120.0 * angle.cos(), -120.0 * angle.sin(), 0.0),
            ));
        }

        Self {
            name: "stress".into(),
            duration_s: 30.0,
            frame_dt: 0.1,
            targets,
            channels: vec![ChannelSpec {
                sensor: SensorSpec::Rf(RfSensorParams {
                    max_range_m: 150_000.0,
                    ..Default::default()
                }),
                manager: ManagerSpec::Air,
                config: TrackManagerConfig {
                    max_tracks: 500,
                    queue_capacity: 1024,
                    log_track_updates: false,
                    ..Default::default()
                },
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_builds() {
        for kind in [
            ScenarioKind::Patrol,
            ScenarioKind::Convoy,
            ScenarioKind::IrFormation,
            ScenarioKind::Stress,
        ] {
            let s = Scenario::build(kind);
            assert!(!s.targets.is_empty());
            assert!(!s.channels.is_empty());
            assert!(s.frame_dt > 0.0);
        }
    }
}
