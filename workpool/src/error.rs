//! Pool error taxonomy.
//!
//! Configuration problems are local validation failures. Degraded starts
//! (fewer threads than asked, or none at all) are logged, not errors.
//! Exhaustion after a completed wait is an internal invariant violation
//! and is surfaced distinctly from ordinary backpressure.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PoolError {
    /// `configure` rejected a parameter; the previous value is retained.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// No worker became available even after waiting for a completion
    /// signal. The job was not run.
    #[error("no worker available after waiting for completion")]
    Exhausted,

    /// `submit` called before `start` or after `shutdown`.
    #[error("pool is not running")]
    NotStarted,
}
