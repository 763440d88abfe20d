//! `workpool` — Fixed-size worker-thread pool with persistent per-thread
//! contexts.
//!
//! Any high-volume per-frame computation can fan independent units of work
//! out across a bounded set of workers and reassemble results before the
//! frame deadline. Each worker owns one reusable context object created
//! once by the pool's [`PoolManager`], so steady-state submission does no
//! per-job allocation.
//!
//! # Module layout
//! - [`pool`]  — The pool itself: configure / start / submit / shutdown
//! - [`error`] — Pool error taxonomy

pub mod error;
pub mod pool;

pub use error::PoolError;
pub use pool::{PoolManager, ThreadPool, MAX_THREADS};
