//! `sim` — Scenario simulator: ground-truth targets, sensor scans, and the
//! frame executive driving the correlation cycles.

pub mod error;
pub mod executive;
pub mod scenario;
pub mod target;

pub use error::SimError;
pub use executive::{Channel, Executive};
pub use scenario::{ChannelSpec, ManagerSpec, Scenario, ScenarioKind, SensorSpec};
pub use target::Target;
