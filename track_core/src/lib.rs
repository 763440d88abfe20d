//! `track_core` — Track management and sensor-report correlation.
//!
//! # Module layout
//! - [`types`]       — Fundamental types (IDs, type bits, reports)
//! - [`queue`]       — Bounded concurrent report queue
//! - [`track`]       — Track record
//! - [`table`]       — Fixed-capacity track table (slot arena)
//! - [`filter`]      — Alpha/beta/gamma predictive filter
//! - [`policy`]      — Gating policies (kinematic, angle-only)
//! - [`association`] — Greedy report-to-track assignment
//! - [`manager`]     — The per-frame correlation cycle
//! - [`error`]       — Configuration / report error types

pub mod association;
pub mod error;
pub mod filter;
pub mod manager;
pub mod policy;
pub mod queue;
pub mod table;
pub mod track;
pub mod types;

pub use error::{ConfigError, ReportError};
pub use filter::Gains;
pub use manager::{CounterSnapshot, TrackManager, TrackManagerConfig};
pub use policy::{AngleOnlyGates, AssociationPolicy, KinematicGates};
pub use queue::BoundedQueue;
pub use table::TrackTable;
pub use track::Track;
pub use types::{MergeStatus, Report, SensorId, TrackId, TrackType, Vec3};
