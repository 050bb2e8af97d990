use core_sim::SimError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("lookback must be at least 1")]
    InvalidLookback,

    #[error("temperature must be finite, got {0}")]
    InvalidTemperature(f64),

    #[error("alpha must lie in [0.01, 1], got {value}")]
    InvalidAlpha { value: f64 },

    #[error("eta must be finite and positive, got {0}")]
    InvalidEta(f64),

    #[error("n_assets must be at least 1")]
    NoAssets,

    #[error("expected step {expected}, got {actual}")]
    StepOutOfSequence { expected: usize, actual: usize },

    #[error("allocation requested for step {step} but only {available} relatives are recorded")]
    StepBeyondHistory { step: usize, available: usize },
}
