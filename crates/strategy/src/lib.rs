pub mod calibrator;
pub mod config;
pub mod error;
pub mod momentum;
pub mod optimizer;
pub mod trader;

pub use calibrator::{retrospective_objective, Calibration, PerturbedLeaderCalibrator};
pub use config::{FtplConfig, MomentumConfig, RandomConfig, Verbosity};
pub use error::StrategyError;
pub use momentum::{centered_softmax, MomentumParams, RelativeHistory, ALPHA_MAX, ALPHA_MIN};
pub use optimizer::{BoundedMinimizer, Minimum};
pub use trader::{FtplMomentumTrader, MomentumTrader, RandomTrader, Trader};
