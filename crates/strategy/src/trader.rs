use core_sim::{Ledger, INITIAL_CASH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::calibrator::{Calibration, PerturbedLeaderCalibrator};
use crate::config::{FtplConfig, MomentumConfig, RandomConfig, Verbosity};
use crate::error::StrategyError;
use crate::momentum::{MomentumParams, RelativeHistory};

/// Steps arrive in order: `trade`, then `update_pnl` with the returned trade.
pub trait Trader {
    fn name(&self) -> &str;

    fn trade(&mut self, prices: &[f64], step: usize) -> Result<Vec<f64>, StrategyError>;

    fn update_pnl(&mut self, prices: &[f64], trade: &[f64]) -> Result<f64, StrategyError>;

    fn ledger(&self) -> &Ledger;
}

#[derive(Debug, Clone)]
pub struct MomentumTrader {
    name: String,
    params: MomentumParams,
    alpha: f64,
    verbosity: Verbosity,
    history: RelativeHistory,
    ledger: Ledger,
}

impl MomentumTrader {
    pub fn new(n_assets: usize, config: MomentumConfig) -> Result<Self, StrategyError> {
        check_assets(n_assets)?;
        let params = config.params()?;

        Ok(Self {
            name: format!("momentum(alpha={})", config.alpha),
            params,
            alpha: config.alpha,
            verbosity: config.verbosity,
            history: RelativeHistory::new(n_assets),
            ledger: Ledger::new(n_assets, INITIAL_CASH),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn history(&self) -> &RelativeHistory {
        &self.history
    }
}

impl Trader for MomentumTrader {
    fn name(&self) -> &str {
        &self.name
    }

    fn trade(&mut self, prices: &[f64], step: usize) -> Result<Vec<f64>, StrategyError> {
        observe_in_sequence(&mut self.history, prices, step)?;
        if self.history.is_empty() {
            return Ok(vec![0.0; self.history.n_assets()]);
        }

        let allocation = self.history.current_allocation(self.alpha, &self.params);
        rebalance(&self.name, self.verbosity, &self.ledger, &allocation, prices, step)
    }

    fn update_pnl(&mut self, prices: &[f64], trade: &[f64]) -> Result<f64, StrategyError> {
        Ok(self.ledger.apply(trade, prices)?)
    }

    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[derive(Debug, Clone)]
pub struct FtplMomentumTrader {
    name: String,
    verbosity: Verbosity,
    calibrator: PerturbedLeaderCalibrator,
    history: RelativeHistory,
    ledger: Ledger,
    last_calibration: Option<Calibration>,
}

impl FtplMomentumTrader {
    pub fn new(n_assets: usize, config: FtplConfig) -> Result<Self, StrategyError> {
        check_assets(n_assets)?;
        let calibrator = PerturbedLeaderCalibrator::new(config.params()?, config.eta, config.seed)?;

        Ok(Self {
            name: "ftpl".to_string(),
            verbosity: config.verbosity,
            calibrator,
            history: RelativeHistory::new(n_assets),
            ledger: Ledger::new(n_assets, INITIAL_CASH),
            last_calibration: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn last_calibration(&self) -> Option<&Calibration> {
        self.last_calibration.as_ref()
    }

    pub fn history(&self) -> &RelativeHistory {
        &self.history
    }
}

impl Trader for FtplMomentumTrader {
    fn name(&self) -> &str {
        &self.name
    }

    fn trade(&mut self, prices: &[f64], step: usize) -> Result<Vec<f64>, StrategyError> {
        observe_in_sequence(&mut self.history, prices, step)?;
        if self.history.is_empty() {
            return Ok(vec![0.0; self.history.n_assets()]);
        }

        let calibration = self.calibrator.calibrate(&self.history);
        if self.verbosity.is_debug() {
            debug!(
                trader = %self.name,
                step,
                alpha_star = calibration.alpha,
                sigma = calibration.sigma,
                converged = calibration.converged,
                iterations = calibration.iterations,
                "calibrated decay"
            );
        }
        self.last_calibration = Some(calibration);

        let allocation = self
            .history
            .current_allocation(calibration.alpha, self.calibrator.params());
        rebalance(&self.name, self.verbosity, &self.ledger, &allocation, prices, step)
    }

    fn update_pnl(&mut self, prices: &[f64], trade: &[f64]) -> Result<f64, StrategyError> {
        Ok(self.ledger.apply(trade, prices)?)
    }

    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

/// Uniform(-1, 1) shares per asset each step, from zero cash.
#[derive(Debug, Clone)]
pub struct RandomTrader {
    name: String,
    rng: StdRng,
    ledger: Ledger,
}

impl RandomTrader {
    pub fn new(n_assets: usize, config: RandomConfig) -> Result<Self, StrategyError> {
        check_assets(n_assets)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            name: "random".to_string(),
            rng,
            ledger: Ledger::new(n_assets, 0.0),
        })
    }
}

impl Trader for RandomTrader {
    fn name(&self) -> &str {
        &self.name
    }

    fn trade(&mut self, prices: &[f64], _step: usize) -> Result<Vec<f64>, StrategyError> {
        let n_assets = self.ledger.n_assets();
        if prices.len() != n_assets {
            return Err(core_sim::SimError::DimensionMismatch {
                expected: n_assets,
                actual: prices.len(),
            }
            .into());
        }

        Ok((0..n_assets).map(|_| self.rng.gen_range(-1.0..1.0)).collect())
    }

    fn update_pnl(&mut self, prices: &[f64], trade: &[f64]) -> Result<f64, StrategyError> {
        Ok(self.ledger.apply(trade, prices)?)
    }

    fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

fn check_assets(n_assets: usize) -> Result<(), StrategyError> {
    if n_assets == 0 {
        return Err(StrategyError::NoAssets);
    }
    Ok(())
}

fn observe_in_sequence(
    history: &mut RelativeHistory,
    prices: &[f64],
    step: usize,
) -> Result<(), StrategyError> {
    let expected = history.next_step();
    if step != expected {
        return Err(StrategyError::StepOutOfSequence {
            expected,
            actual: step,
        });
    }
    history.observe(prices)
}

fn rebalance(
    name: &str,
    verbosity: Verbosity,
    ledger: &Ledger,
    allocation: &[f64],
    prices: &[f64],
    step: usize,
) -> Result<Vec<f64>, StrategyError> {
    let trade = ledger.rebalance_trade(allocation, prices)?;
    if verbosity.is_debug() {
        debug!(
            trader = %name,
            step,
            old_position = ?ledger.position(),
            allocation = ?allocation,
            trade = ?trade,
            "rebalancing"
        );
    }
    Ok(trade)
}
