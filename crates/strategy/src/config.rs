use crate::error::StrategyError;
use crate::momentum::{MomentumParams, ALPHA_MAX, ALPHA_MIN};

pub const DEFAULT_LOOKBACK: usize = 30;
pub const DEFAULT_TEMPERATURE: f64 = 30.0;
pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_ETA: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Quiet,
    Debug,
}

impl Verbosity {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            Self::Debug
        } else {
            Self::Quiet
        }
    }

    pub fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumConfig {
    pub lookback: usize,
    pub temperature: f64,
    pub alpha: f64,
    pub verbosity: Verbosity,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            temperature: DEFAULT_TEMPERATURE,
            alpha: DEFAULT_ALPHA,
            verbosity: Verbosity::Quiet,
        }
    }
}

impl MomentumConfig {
    pub fn params(&self) -> Result<MomentumParams, StrategyError> {
        if !self.alpha.is_finite() || !(ALPHA_MIN..=ALPHA_MAX).contains(&self.alpha) {
            return Err(StrategyError::InvalidAlpha { value: self.alpha });
        }
        MomentumParams::new(self.lookback, self.temperature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FtplConfig {
    pub lookback: usize,
    pub temperature: f64,
    pub eta: f64,
    pub seed: Option<u64>,
    pub verbosity: Verbosity,
}

impl Default for FtplConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            temperature: DEFAULT_TEMPERATURE,
            eta: DEFAULT_ETA,
            seed: None,
            verbosity: Verbosity::Quiet,
        }
    }
}

impl FtplConfig {
    pub fn params(&self) -> Result<MomentumParams, StrategyError> {
        MomentumParams::new(self.lookback, self.temperature)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}
