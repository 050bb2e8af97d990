use core_sim::SimError;
use strategy::StrategyError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("trader {trader} expects {expected} assets but the price source has {actual}")]
    AssetCountMismatch {
        trader: String,
        expected: usize,
        actual: usize,
    },
}
