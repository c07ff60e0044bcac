use fault_lab_abstract::ConfigError;
use thiserror::Error;

use crate::stats::StatsError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("stress test has already been run")]
    AlreadyRun,
}
