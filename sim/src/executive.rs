//! Frame executive: steps ground truth, scans sensors, runs the
//! correlation cycles.
//!
//! Each frame the executive advances every target, lets every sensor
//! scan the active contacts, pushes the resulting reports into that
//! channel's manager, then fans the per-manager `process(dt)` cycles out
//! over a worker pool. With zero workers the pool runs the cycles
//! synchronously on the executive's thread, so single-threaded runs take
//! the same code path.

use crate::error::SimError;
use crate::scenario::{ChannelSpec, ManagerSpec, Scenario, SensorSpec};
use crate::target::Target;
use sensor_models::{Contact, IrSensor, RfSensor};
use std::sync::Arc;
use tracing::{debug, error};
use track_core::TrackManager;
use track_core::types::SensorId;
use workpool::{PoolManager, ThreadPool};

/// Either sensor kind, scanned uniformly by the executive.
pub enum Sensor {
    Rf(RfSensor),
    Ir(IrSensor),
}

impl Sensor {
    fn scan(&mut self, contacts: &[Contact], time: f64) -> Vec<track_core::types::Report> {
        match self {
            Sensor::Rf(s) => s.scan(contacts, time),
            Sensor::Ir(s) => s.scan(contacts, time),
        }
    }
}

/// One sensor wired to one manager.
pub struct Channel {
    pub sensor: Sensor,
    pub manager: Arc<TrackManager>,
}

/// One correlation cycle handed to a pool worker.
pub struct CycleJob {
    manager: Arc<TrackManager>,
    dt: f64,
}

/// Pool lifecycle for cycle workers. The context is a per-worker cycle
/// counter, reported when the worker retires.
pub struct CycleDispatch;

impl PoolManager for CycleDispatch {
    type Context = u64;
    type Job = CycleJob;

    fn initialize(&self) -> u64 {
        0
    }

    fn execute(&self, cycles: &mut u64, job: Option<CycleJob>) {
        if let Some(job) = job {
            job.manager.process(job.dt);
            *cycles += 1;
        }
    }

    fn destroy(&self, cycles: u64) {
        debug!(cycles, "cycle worker retired");
    }
}

/// Drives one scenario frame by frame.
pub struct Executive {
    time: f64,
    frame_dt: f64,
    frames_run: u64,
    targets: Vec<Target>,
    channels: Vec<Channel>,
    pool: ThreadPool<CycleDispatch>,
}

impl Executive {
    /// Build sensors, managers, and the cycle pool for a scenario.
    /// `num_threads == 0` runs every cycle on the executive's thread.
    pub fn new(scenario: &Scenario, num_threads: usize, seed: u64) -> Result<Self, SimError> {
        let mut channels = Vec::with_capacity(scenario.channels.len());
        for (i, spec) in scenario.channels.iter().enumerate() {
            channels.push(build_channel(spec, i, seed)?);
        }

        let mut pool = ThreadPool::new(CycleDispatch);
        pool.configure(num_threads, 0.5)?;
        pool.start();

        Ok(Self {
            time: 0.0,
            frame_dt: scenario.frame_dt,
            frames_run: 0,
            targets: scenario.targets.clone(),
            channels,
            pool,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Advance ground truth by one frame and run every channel's cycle.
    pub fn run_frame(&mut self) {
        let dt = self.frame_dt;
        for target in &mut self.targets {
            target.step(dt);
        }
        self.time += dt;
        self.frames_run += 1;

        let contacts: Vec<Contact> = self
            .targets
            .iter()
            .filter(|t| t.is_active(self.time))
            .map(Target::contact)
            .collect();

        for channel in &mut self.channels {
            for report in channel.sensor.scan(&contacts, self.time) {
                let sn = report.signal_to_noise_db;
                // Drops are counted by the manager; nothing to do here.
                channel.manager.new_report(report, sn);
            }
        }

        for channel in &self.channels {
            let job = CycleJob {
                manager: Arc::clone(&channel.manager),
                dt,
            };
            if let Err(e) = self.pool.submit(job) {
                error!(error = %e, "cycle submission failed, running inline");
                channel.manager.process(dt);
            }
        }
        self.pool.wait_idle();
    }

    /// Run `frames` frames back to back.
    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.run_frame();
        }
    }

    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }
}

fn build_channel(spec: &ChannelSpec, index: usize, seed: u64) -> Result<Channel, SimError> {
    let sensor_id = SensorId(index as u32);
    let sensor_seed = seed.wrapping_add(index as u64);
    let sensor = match &spec.sensor {
        SensorSpec::Rf(params) => Sensor::Rf(RfSensor::new(sensor_id, params.clone(), sensor_seed)),
        SensorSpec::Ir(params) => Sensor::Ir(IrSensor::new(sensor_id, params.clone(), sensor_seed)),
    };
    let manager = match &spec.manager {
        ManagerSpec::Air => TrackManager::air(spec.config.clone())?,
        ManagerSpec::Gmti => TrackManager::gmti(spec.config.clone())?,
        ManagerSpec::Rwr => TrackManager::rwr(spec.config.clone())?,
        ManagerSpec::AngleOnly(gates) => {
            TrackManager::angle_only(gates.clone(), spec.config.clone())?
        }
    };
    Ok(Channel {
        sensor,
        manager: Arc::new(manager),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioKind;

    #[test]
    fn patrol_forms_tracks() {
        let scenario = Scenario::build(ScenarioKind::Patrol);
        let mut exec = Executive::new(&scenario, 0, 42).unwrap();
        exec.run(20); // 2 s at 10 Hz
        let manager = &exec.channels()[0].manager;
        assert_eq!(manager.num_tracks(), 4, "one track per aircraft");
        exec.shutdown();
    }

    #[test]
    fn pooled_run_matches_track_count() {
        let scenario = Scenario::build(ScenarioKind::Patrol);
        let mut exec = Executive::new(&scenario, 2, 42).unwrap();
        exec.run(20);
        assert_eq!(exec.channels()[0].manager.num_tracks(), 4);
        exec.shutdown();
    }

    #[test]
    fn ir_formation_merges_pair() {
        let scenario = Scenario::build(ScenarioKind::IrFormation);
        let mut exec = Executive::new(&scenario, 0, 7).unwrap();
        exec.run(10);
        // The formation pair occupies one resolution cell, so the
        // angle-only manager sees three usable returns per scan.
        let n = exec.channels()[0].manager.num_tracks();
        assert!(n <= 3, "merged pair must not spawn a fourth track, got {n}");
        assert!(n >= 1);
        exec.shutdown();
    }
}
