//! Error taxonomy for the track correlation core.
//!
//! Nothing inside `process(dt)` propagates an error to the frame driver:
//! per-report problems are logged and skipped, capacity pressure is a
//! counted drop. Only configuration changes surface errors synchronously
//! to the caller that attempted them.

use thiserror::Error;

/// A rejected configuration change. The previous value is always retained.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} is out of range: {value} (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(name: &'static str, value: f64, expected: &'static str) -> Self {
        ConfigError::OutOfRange {
            name,
            value,
            expected,
        }
    }
}

/// Why a report was considered malformed and skipped.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("report kinematics contain non-finite values")]
    NonFiniteKinematics,
    #[error("report angles are non-finite")]
    NonFiniteAngles,
    #[error("report range is invalid: {0}")]
    BadRange(f64),
    #[error("report signal-to-noise is non-finite")]
    NonFiniteSignal,
}
