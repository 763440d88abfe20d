//! Simulation error taxonomy.

use thiserror::Error;
use track_core::ConfigError;
use workpool::PoolError;

#[derive(Debug, Error)]
pub enum SimError {
    /// A channel's manager configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The cycle pool could not be configured.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
