use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("step {step} exceeds the number of simulated steps ({n_steps})")]
    StepOutOfRange { step: usize, n_steps: usize },

    #[error("vector length mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid environment config: {0}")]
    InvalidConfig(&'static str),

    #[error("price at step {step}, asset {asset} must be finite and positive, got {price}")]
    InvalidPrice { step: usize, asset: usize, price: f64 },
}
