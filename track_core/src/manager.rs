//! Track manager: owns the track table, the report queue, the prediction
//! filter, and the per-frame correlation cycle.
//!
//! # Cycle phases (one `process(dt)` call)
//! 1. Drain all queued (report, signal/noise) pairs — bounded, non-blocking
//! 2. Gate every report against every live compatible track
//! 3. Resolve ambiguous matches greedily (best combined error first)
//! 4. Filter-update matched tracks, reset their age
//! 5. Create tracks for unmatched reports (S/N floor + capacity checks)
//! 6. Age unmatched tracks by `dt`, evict those past the age limit
//!
//! `process` never fails: malformed reports are skipped and logged, queue
//! and table overflow are counted drops, and the table is left consistent
//! at every exit. Readers take snapshot copies at any time via
//! [`TrackManager::get_track_list`].

use crate::association::{greedy_assign, Candidate};
use crate::error::ConfigError;
use crate::filter::{self, Gains};
use crate::policy::{AngleOnlyGates, AssociationPolicy, KinematicGates};
use crate::queue::BoundedQueue;
use crate::table::TrackTable;
use crate::track::Track;
use crate::types::{Report, TrackId, TrackType};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Hard upper bound on the configurable track table size.
pub const MAX_TRACKS: usize = 1000;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Construction-time configuration. Runtime-settable values (gains, age
/// limit, logging flag) can also be changed later through the validated
/// setters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackManagerConfig {
    /// Track table capacity.
    pub max_tracks: usize,
    /// A track unmatched for longer than this is evicted (seconds).
    pub max_track_age_s: f64,
    /// First track ID handed out; IDs increase monotonically from here.
    pub first_track_id: u64,
    /// Alpha/beta/gamma filter gains.
    pub gains: Gains,
    /// Report input queue capacity.
    pub queue_capacity: usize,
    /// Log every track create/update/evict event.
    pub log_track_updates: bool,
}

impl Default for TrackManagerConfig {
    fn default() -> Self {
        Self {
            max_tracks: 200,
            max_track_age_s: 3.0,
            first_track_id: 1000,
            gains: Gains::default(),
            queue_capacity: 256,
            log_track_updates: true,
        }
    }
}

impl TrackManagerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tracks == 0 || self.max_tracks > MAX_TRACKS {
            return Err(ConfigError::out_of_range(
                "max_tracks",
                self.max_tracks as f64,
                "1 ..= 1000",
            ));
        }
        if !(self.max_track_age_s > 0.0) || !self.max_track_age_s.is_finite() {
            return Err(ConfigError::out_of_range(
                "max_track_age_s",
                self.max_track_age_s,
                "> 0",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::out_of_range(
                "queue_capacity",
                self.queue_capacity as f64,
                ">= 1",
            ));
        }
        self.gains.validate()
    }
}

// ---------------------------------------------------------------------------
// Diagnostics counters
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Counters {
    reports_dropped_queue_full: AtomicU64,
    reports_discarded_by_policy: AtomicU64,
    reports_dropped_table_full: AtomicU64,
    reports_rejected_low_sn: AtomicU64,
    reports_skipped_malformed: AtomicU64,
    tracks_created: AtomicU64,
    tracks_evicted: AtomicU64,
}

/// Point-in-time copy of the diagnostic counters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Reports rejected at `new_report` because the queue was full.
    pub reports_dropped_queue_full: u64,
    /// Reports the association policy refused to queue (e.g. angle-only
    /// managers discard merged-out returns). Filtering, not backpressure.
    pub reports_discarded_by_policy: u64,
    /// Unmatched reports discarded because the table had no usable slot.
    pub reports_dropped_table_full: u64,
    /// Unmatched reports below the policy's signal-to-noise floor.
    pub reports_rejected_low_sn: u64,
    /// Reports skipped for carrying malformed data.
    pub reports_skipped_malformed: u64,
    pub tracks_created: u64,
    pub tracks_evicted: u64,
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Runtime-settable parameters, read once per cycle.
#[derive(Clone, Debug)]
struct Settings {
    max_track_age_s: f64,
    gains: Gains,
    log_track_updates: bool,
}

/// A queued (report, signal/noise) pair, consumed exactly once per cycle.
#[derive(Clone, Debug)]
struct QueuedReport {
    report: Report,
    signal_to_noise_db: f64,
}

/// Correlates sensor reports into tracks. One instance per sensor mode;
/// the association policy (air, gmti, rwr, angle-only) is chosen at
/// construction.
pub struct TrackManager {
    policy: Box<dyn AssociationPolicy>,
    table: TrackTable,
    queue: BoundedQueue<QueuedReport>,
    settings: Mutex<Settings>,
    next_track_id: AtomicU64,
    /// Serializes `process`; the design runs one consumer per manager.
    cycle: Mutex<()>,
    counters: Counters,
}

impl TrackManager {
    pub fn new(
        policy: Box<dyn AssociationPolicy>,
        config: TrackManagerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            policy = policy.name(),
            max_tracks = config.max_tracks,
            max_track_age_s = config.max_track_age_s,
            "track manager created"
        );
        Ok(Self {
            policy,
            table: TrackTable::new(config.max_tracks),
            queue: BoundedQueue::new(config.queue_capacity),
            settings: Mutex::new(Settings {
                max_track_age_s: config.max_track_age_s,
                gains: config.gains,
                log_track_updates: config.log_track_updates,
            }),
            next_track_id: AtomicU64::new(config.first_track_id),
            cycle: Mutex::new(()),
            counters: Counters::default(),
        })
    }

    /// Air-to-air mode manager (TWS, ACM, SST gates).
    pub fn air(config: TrackManagerConfig) -> Result<Self, ConfigError> {
        Self::new(Box::new(KinematicGates::air()), config)
    }

    /// Ground moving target indication manager.
    pub fn gmti(config: TrackManagerConfig) -> Result<Self, ConfigError> {
        Self::new(Box::new(KinematicGates::gmti()), config)
    }

    /// Radar warning receiver manager.
    pub fn rwr(config: TrackManagerConfig) -> Result<Self, ConfigError> {
        Self::new(Box::new(KinematicGates::rwr()), config)
    }

    /// Angle-only (azimuth/elevation, no range) manager.
    pub fn angle_only(
        gates: AngleOnlyGates,
        config: TrackManagerConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(Box::new(gates), config)
    }

    // -----------------------------------------------------------------
    // Producer side
    // -----------------------------------------------------------------

    /// Push a new sensor report for the next cycle. Non-blocking; returns
    /// `false` (and counts the drop) if the input queue is full.
    pub fn new_report(&self, report: Report, signal_to_noise_db: f64) -> bool {
        if !self.policy.accepts(&report) {
            self.counters
                .reports_discarded_by_policy
                .fetch_add(1, Ordering::Relaxed);
            debug!(
                policy = self.policy.name(),
                sensor = %report.sensor_id,
                "report discarded by policy"
            );
            return false;
        }
        let accepted = self.queue.push(QueuedReport {
            report,
            signal_to_noise_db,
        });
        if !accepted {
            self.counters
                .reports_dropped_queue_full
                .fetch_add(1, Ordering::Relaxed);
            warn!(policy = self.policy.name(), "report queue full, report dropped");
        }
        accepted
    }

    // -----------------------------------------------------------------
    // Consumer side — one call per simulation frame
    // -----------------------------------------------------------------

    /// Run one correlation cycle. Never fails; all per-report and per-track
    /// problems are handled locally.
    pub fn process(&self, dt: f64) {
        let Ok(_guard) = self.cycle.try_lock() else {
            // One consumer per manager; a second concurrent call is a
            // caller bug and its cycle is skipped.
            error!(
                policy = self.policy.name(),
                "concurrent process() on track manager, cycle skipped"
            );
            return;
        };

        let settings = self.settings.lock().expect("settings mutex poisoned").clone();
        let drained = self.queue.try_pop_all(self.queue.capacity());

        // Validate before association; malformed reports are skipped.
        let mut reports: Vec<QueuedReport> = Vec::with_capacity(drained.len());
        for mut qr in drained {
            match qr.report.validate() {
                Ok(()) => {
                    qr.report.signal_to_noise_db = qr.signal_to_noise_db;
                    reports.push(qr);
                }
                Err(e) => {
                    self.counters
                        .reports_skipped_malformed
                        .fetch_add(1, Ordering::Relaxed);
                    warn!(policy = self.policy.name(), error = %e, "malformed report skipped");
                }
            }
        }

        self.table.with_mut(|slots| {
            // Stable view of the live tracks for gating; updates are applied
            // back through the slots by track ID.
            let tracks: Vec<Track> = slots.iter().cloned().collect();
            let manager_type = self.policy.track_type();

            // Gate matrix: every report against every compatible track.
            let policy = &*self.policy;
            let candidates: Vec<Candidate> = reports
                .par_iter()
                .enumerate()
                .flat_map_iter(|(ri, qr)| {
                    tracks
                        .iter()
                        .enumerate()
                        .filter(move |(_, t)| t.track_type.intersects(manager_type))
                        .filter_map(move |(ti, t)| {
                            let dt_pred = (qr.report.time - t.last_updated).max(0.0);
                            policy.gate(&qr.report, t, dt_pred).map(|score| Candidate {
                                report_idx: ri,
                                track_idx: ti,
                                score,
                            })
                        })
                })
                .collect();

            let assignment = greedy_assign(candidates, reports.len(), tracks.len());
            let mut touched: HashSet<TrackId> = HashSet::with_capacity(assignment.pairs.len());

            // Filter-update matched tracks.
            for &(ri, ti) in &assignment.pairs {
                let id = tracks[ti].id;
                let report = &reports[ri].report;
                let Some(track) = slots.iter_mut().find(|t| t.id == id) else {
                    continue;
                };
                let dt_pred = (report.time - track.last_updated).max(0.0);
                let (obs_pos, obs_vel) = self.policy.observed_kinematics(report);
                filter::smooth(track, obs_pos, obs_vel, &settings.gains, dt_pred.max(dt));
                track.note_match(report);
                touched.insert(id);
                if settings.log_track_updates {
                    debug!(
                        policy = self.policy.name(),
                        track = %id,
                        sensor = %report.sensor_id,
                        sn_db = report.signal_to_noise_db,
                        "track updated"
                    );
                }
            }

            // Create tracks for unmatched reports.
            for &ri in &assignment.unmatched_reports {
                let report = &reports[ri].report;
                if report.signal_to_noise_db < self.policy.min_signal_to_noise_db() {
                    self.counters
                        .reports_rejected_low_sn
                        .fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                if slots.is_full() {
                    // Capacity pressure: evict the oldest track, but never
                    // one that was touched this cycle.
                    let oldest_is_fresh = slots.iter().all(|t| t.age <= 0.0);
                    if oldest_is_fresh {
                        self.counters
                            .reports_dropped_table_full
                            .fetch_add(1, Ordering::Relaxed);
                        warn!(
                            policy = self.policy.name(),
                            "track table full, unmatched report dropped"
                        );
                        continue;
                    }
                    if let Some(victim) = slots.evict_oldest() {
                        self.counters.tracks_evicted.fetch_add(1, Ordering::Relaxed);
                        if settings.log_track_updates {
                            debug!(
                                policy = self.policy.name(),
                                track = %victim.id,
                                age = victim.age,
                                "track evicted under capacity pressure"
                            );
                        }
                    }
                }

                let id = TrackId(self.next_track_id.fetch_add(1, Ordering::Relaxed));
                let (obs_pos, obs_vel) = self.policy.observed_kinematics(report);
                let mut track = Track::from_report(id, manager_type, report);
                track.position = obs_pos;
                track.velocity = obs_vel;
                if slots.insert(track) {
                    self.counters.tracks_created.fetch_add(1, Ordering::Relaxed);
                    touched.insert(id);
                    if settings.log_track_updates {
                        debug!(policy = self.policy.name(), track = %id, "track created");
                    }
                }
            }

            // Age every track not matched or created this cycle, then evict
            // the stale ones.
            for track in slots.iter_mut() {
                if !touched.contains(&track.id) {
                    track.age += dt;
                }
            }
            for evicted in slots.remove_aged(settings.max_track_age_s) {
                self.counters.tracks_evicted.fetch_add(1, Ordering::Relaxed);
                if settings.log_track_updates {
                    debug!(
                        policy = self.policy.name(),
                        track = %evicted.id,
                        age = evicted.age,
                        "track aged out"
                    );
                }
            }
        });
    }

    // -----------------------------------------------------------------
    // Reader side
    // -----------------------------------------------------------------

    /// Snapshot copies of up to `max` current tracks. Safe to call from any
    /// thread, concurrently with the cycle.
    pub fn get_track_list(&self, max: usize) -> Vec<Track> {
        self.table.snapshot(max)
    }

    pub fn num_tracks(&self) -> usize {
        self.table.len()
    }

    pub fn max_tracks(&self) -> usize {
        self.table.capacity()
    }

    /// Type bits of the tracks this manager maintains.
    pub fn track_type(&self) -> TrackType {
        self.policy.track_type()
    }

    pub fn is_type(&self, t: TrackType) -> bool {
        self.policy.track_type().intersects(t)
    }

    pub fn counters(&self) -> CounterSnapshot {
        CounterSnapshot {
            reports_dropped_queue_full: self
                .counters
                .reports_dropped_queue_full
                .load(Ordering::Relaxed),
            reports_discarded_by_policy: self
                .counters
                .reports_discarded_by_policy
                .load(Ordering::Relaxed),
            reports_dropped_table_full: self
                .counters
                .reports_dropped_table_full
                .load(Ordering::Relaxed),
            reports_rejected_low_sn: self.counters.reports_rejected_low_sn.load(Ordering::Relaxed),
            reports_skipped_malformed: self
                .counters
                .reports_skipped_malformed
                .load(Ordering::Relaxed),
            tracks_created: self.counters.tracks_created.load(Ordering::Relaxed),
            tracks_evicted: self.counters.tracks_evicted.load(Ordering::Relaxed),
        }
    }

    // -----------------------------------------------------------------
    // Lifecycle / configuration
    // -----------------------------------------------------------------

    /// Drop all tracks and everything queued. Track IDs keep increasing;
    /// they are never reused across a clear.
    pub fn clear_tracks_and_queues(&self) {
        let _guard = self.cycle.lock().expect("cycle mutex poisoned");
        self.queue.clear();
        self.table.with_mut(|slots| slots.clear());
    }

    /// Return the manager to its freshly-constructed state: no tracks,
    /// nothing queued, counters zeroed. Track IDs are not rewound.
    pub fn reset(&self) {
        self.clear_tracks_and_queues();
        self.counters.reports_dropped_queue_full.store(0, Ordering::Relaxed);
        self.counters.reports_discarded_by_policy.store(0, Ordering::Relaxed);
        self.counters.reports_dropped_table_full.store(0, Ordering::Relaxed);
        self.counters.reports_rejected_low_sn.store(0, Ordering::Relaxed);
        self.counters.reports_skipped_malformed.store(0, Ordering::Relaxed);
        self.counters.tracks_created.store(0, Ordering::Relaxed);
        self.counters.tracks_evicted.store(0, Ordering::Relaxed);
        info!(policy = self.policy.name(), "track manager reset");
    }

    /// Validated setter: rejects out-of-range gains, keeps the old value.
    pub fn set_gains(&self, gains: Gains) -> Result<(), ConfigError> {
        gains.validate()?;
        self.settings.lock().expect("settings mutex poisoned").gains = gains;
        Ok(())
    }

    /// Validated setter: rejects a non-positive age limit, keeps the old value.
    pub fn set_max_track_age(&self, seconds: f64) -> Result<(), ConfigError> {
        if !(seconds > 0.0) || !seconds.is_finite() {
            return Err(ConfigError::out_of_range("max_track_age_s", seconds, "> 0"));
        }
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .max_track_age_s = seconds;
        Ok(())
    }

    pub fn set_log_track_updates(&self, enabled: bool) {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .log_track_updates = enabled;
    }

    pub fn max_track_age(&self) -> f64 {
        self.settings
            .lock()
            .expect("settings mutex poisoned")
            .max_track_age_s
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MergeStatus, SensorId, Vec3};
    use approx::assert_abs_diff_eq;

    fn report(x: f64, y: f64, t: f64) -> Report {
        let position = Vec3::new(x, y, 0.0);
        Report {
            sensor_id: SensorId(7),
            time: t,
            signal_to_noise_db: 20.0,
            azimuth_rad: y.atan2(x),
            elevation_rad: 0.0,
            range_m: Some(position.norm()),
            position,
            velocity: Vec3::new(10.0, 0.0, 0.0),
            acceleration: Vec3::zeros(),
            merge_status: MergeStatus::NotMerged,
            truth_position: None,
            truth_velocity: None,
        }
    }

    fn manager(max_tracks: usize) -> TrackManager {
        TrackManager::air(TrackManagerConfig {
            max_tracks,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = TrackManagerConfig {
            max_tracks: 0,
            ..Default::default()
        };
        assert!(TrackManager::air(bad).is_err());

        let bad = TrackManagerConfig {
            max_track_age_s: -1.0,
            ..Default::default()
        };
        assert!(TrackManager::air(bad).is_err());
    }

    #[test]
    fn report_creates_track() {
        let mgr = manager(10);
        assert!(mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0));
        mgr.process(0.05);
        assert_eq!(mgr.num_tracks(), 1);
        let tracks = mgr.get_track_list(10);
        assert_eq!(tracks[0].id, TrackId(1000), "first ID comes from first_track_id");
    }

    #[test]
    fn matched_report_updates_not_creates() {
        let mgr = manager(10);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        mgr.new_report(report(10_010.0, 0.0, 1.0), 22.0);
        mgr.process(0.05);

        assert_eq!(mgr.num_tracks(), 1, "in-gate report must update, not create");
        let t = &mgr.get_track_list(10)[0];
        assert_eq!(t.age, 0.0);
        assert_abs_diff_eq!(t.signal_to_noise_db, 22.0);
    }

    #[test]
    fn offset_sensor_reports_update_one_track() {
        // Sensor at x = 50 km observing a target at x = 60 km: slant range
        // 10 km, world range 60 km. Successive scans must keep matching
        // the same track.
        let mgr = manager(10);
        let mut first = report(60_000.0, 0.0, 0.0);
        first.range_m = Some(10_000.0);
        mgr.new_report(first, 20.0);
        mgr.process(0.05);

        let mut second = report(60_010.0, 0.0, 1.0);
        second.range_m = Some(10_010.0);
        mgr.new_report(second, 20.0);
        mgr.process(0.05);

        assert_eq!(
            mgr.num_tracks(),
            1,
            "in-gate report from an offset sensor must update, not duplicate"
        );
    }

    #[test]
    fn alpha_one_follows_latest_observation() {
        // alpha=1, beta=0, gamma=0: full trust in the latest observation.
        let mgr = manager(10);
        mgr.new_report(report(100.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        mgr.new_report(report(110.0, 0.0, 1.0), 20.0);
        mgr.process(0.05);

        let t = &mgr.get_track_list(1)[0];
        assert_abs_diff_eq!(t.position.x, 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.position.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn table_full_drops_second_report_and_counts() {
        let mgr = manager(1);
        // Two uncorrelated targets in one cycle; gates can't bridge 100 km.
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.new_report(report(-90_000.0, 50_000.0, 0.0), 20.0);
        mgr.process(0.05);

        assert_eq!(mgr.num_tracks(), 1);
        let c = mgr.counters();
        assert_eq!(c.tracks_created, 1);
        assert_eq!(c.reports_dropped_table_full, 1);
    }

    #[test]
    fn stale_track_aged_out() {
        let mgr = manager(10);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        assert_eq!(mgr.num_tracks(), 1);

        // max_track_age_s = 3.0: four unmatched seconds age it out.
        for _ in 0..4 {
            mgr.process(1.0);
        }
        assert_eq!(mgr.num_tracks(), 0, "aged track must leave the snapshot");
        assert_eq!(mgr.counters().tracks_evicted, 1);
    }

    #[test]
    fn ids_strictly_increase_across_drop_create() {
        let mgr = manager(1);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        let first = mgr.get_track_list(1)[0].id;

        for _ in 0..4 {
            mgr.process(1.0); // age out
        }
        assert_eq!(mgr.num_tracks(), 0);

        mgr.new_report(report(50_000.0, 20_000.0, 10.0), 20.0);
        mgr.process(0.05);
        let second = mgr.get_track_list(1)[0].id;
        assert!(second > first, "reused slot must get a strictly greater ID");
    }

    #[test]
    fn low_sn_report_never_creates_track() {
        let mut gates = KinematicGates::air();
        gates.min_signal_to_noise_db = 10.0;
        let mgr = TrackManager::new(Box::new(gates), TrackManagerConfig::default()).unwrap();

        mgr.new_report(report(10_000.0, 0.0, 0.0), 5.0);
        mgr.process(0.05);
        assert_eq!(mgr.num_tracks(), 0);
        assert_eq!(mgr.counters().reports_rejected_low_sn, 1);
    }

    #[test]
    fn malformed_report_skipped_cycle_continues() {
        let mgr = manager(10);
        let mut bad = report(10_000.0, 0.0, 0.0);
        bad.position.x = f64::NAN;
        mgr.new_report(bad, 20.0);
        mgr.new_report(report(20_000.0, 5_000.0, 0.0), 20.0);
        mgr.process(0.05);

        assert_eq!(mgr.num_tracks(), 1, "good report still processed");
        assert_eq!(mgr.counters().reports_skipped_malformed, 1);
    }

    #[test]
    fn queue_overflow_counted() {
        let mgr = TrackManager::air(TrackManagerConfig {
            queue_capacity: 2,
            ..Default::default()
        })
        .unwrap();
        assert!(mgr.new_report(report(1.0, 0.0, 0.0), 20.0));
        assert!(mgr.new_report(report(2.0, 0.0, 0.0), 20.0));
        assert!(!mgr.new_report(report(3.0, 0.0, 0.0), 20.0));
        assert_eq!(mgr.counters().reports_dropped_queue_full, 1);
    }

    #[test]
    fn num_tracks_never_exceeds_capacity() {
        let mgr = manager(3);
        for i in 0..8 {
            // Spread targets far apart so nothing gates together.
            let x = 10_000.0 + 50_000.0 * i as f64;
            mgr.new_report(report(x, -x, 0.0), 20.0);
        }
        mgr.process(0.05);
        assert!(mgr.num_tracks() <= 3);
    }

    #[test]
    fn snapshot_respects_max() {
        let mgr = manager(10);
        for i in 0..4 {
            mgr.new_report(report(10_000.0 + 60_000.0 * i as f64, 0.0, 0.0), 20.0);
        }
        mgr.process(0.05);
        assert_eq!(mgr.get_track_list(2).len(), 2);
    }

    #[test]
    fn setter_rejection_retains_previous_value() {
        let mgr = manager(10);
        assert!(mgr.set_max_track_age(-5.0).is_err());
        assert_abs_diff_eq!(mgr.max_track_age(), 3.0);
        assert!(mgr.set_max_track_age(10.0).is_ok());
        assert_abs_diff_eq!(mgr.max_track_age(), 10.0);

        assert!(mgr
            .set_gains(Gains {
                alpha: 2.0,
                beta: 0.0,
                gamma: 0.0
            })
            .is_err());
    }

    #[test]
    fn clear_tracks_and_queues_empties_both() {
        let mgr = manager(10);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        mgr.new_report(report(10_010.0, 0.0, 1.0), 20.0);
        mgr.clear_tracks_and_queues();
        assert_eq!(mgr.num_tracks(), 0);
        mgr.process(0.05);
        assert_eq!(mgr.num_tracks(), 0, "queued report was discarded by clear");
    }

    #[test]
    fn reset_clears_state_and_counters() {
        let mgr = manager(1);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.new_report(report(-90_000.0, 50_000.0, 0.0), 20.0);
        mgr.process(0.05);
        assert_eq!(mgr.counters().tracks_created, 1);

        mgr.reset();
        assert_eq!(mgr.num_tracks(), 0);
        assert_eq!(mgr.counters().tracks_created, 0);
        assert_eq!(mgr.counters().reports_dropped_table_full, 0);

        // IDs keep increasing across a reset.
        mgr.new_report(report(10_000.0, 0.0, 1.0), 20.0);
        mgr.process(0.05);
        assert!(mgr.get_track_list(1)[0].id > TrackId(1000));
    }

    #[test]
    fn angle_only_discards_merged_out_report() {
        let mgr =
            TrackManager::angle_only(AngleOnlyGates::default(), TrackManagerConfig::default())
                .unwrap();
        let mut merged_out = report(10_000.0, 0.0, 0.0);
        merged_out.merge_status = MergeStatus::MergedOut;
        assert!(!mgr.new_report(merged_out, 20.0));
        mgr.process(0.05);
        assert_eq!(mgr.num_tracks(), 0);
        // Filtering is counted apart from backpressure.
        let c = mgr.counters();
        assert_eq!(c.reports_discarded_by_policy, 1);
        assert_eq!(c.reports_dropped_queue_full, 0);
    }

    #[test]
    fn angle_only_merged_report_honors_truth_preference() {
        let gates = AngleOnlyGates {
            use_perceived_pos_vel: false,
            ..Default::default()
        };
        let mgr = TrackManager::angle_only(gates, TrackManagerConfig::default()).unwrap();

        let mut merged = report(10_000.0, 0.0, 0.0);
        merged.merge_status = MergeStatus::Merged;
        merged.truth_position = Some(Vec3::new(10_000.0, 40.0, 0.0));
        merged.truth_velocity = Some(Vec3::new(-5.0, 0.0, 0.0));
        mgr.new_report(merged, 20.0);
        mgr.process(0.05);

        let t = &mgr.get_track_list(1)[0];
        assert_abs_diff_eq!(t.position.y, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.velocity.x, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn capacity_pressure_evicts_stale_track_for_fresh_report() {
        let mgr = manager(1);
        mgr.new_report(report(10_000.0, 0.0, 0.0), 20.0);
        mgr.process(0.05);
        let old_id = mgr.get_track_list(1)[0].id;

        // Age the track (unmatched), then offer a fresh far-away report.
        mgr.process(1.0);
        mgr.new_report(report(-80_000.0, 40_000.0, 2.0), 20.0);
        mgr.process(0.05);

        let tracks = mgr.get_track_list(1);
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].id > old_id, "stale track evicted for the new report");
        assert_eq!(mgr.counters().tracks_evicted, 1);
    }
}
