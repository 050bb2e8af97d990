use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use tracing::warn;

use crate::error::StrategyError;
use crate::momentum::{MomentumParams, RelativeHistory, ALPHA_MAX, ALPHA_MIN};
use crate::optimizer::BoundedMinimizer;

pub const CALIBRATION_START: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub alpha: f64,
    pub sigma: f64,
    pub objective: f64,
    pub converged: bool,
    pub iterations: usize,
    pub evaluations: usize,
}

/// `-sigma * alpha - sum_s ln(dot(relative[s], allocation(alpha, s)))`
pub fn retrospective_objective(
    history: &RelativeHistory,
    alpha: f64,
    sigma: f64,
    params: &MomentumParams,
) -> f64 {
    let mut value = -sigma * alpha;
    for (step, relative) in history.relatives().iter().enumerate() {
        let allocation = history.allocation_unchecked(step, alpha, params);
        value -= core_sim::dot(relative, &allocation).ln();
    }
    value
}

#[derive(Debug, Clone)]
pub struct PerturbedLeaderCalibrator<R = StdRng> {
    params: MomentumParams,
    perturbation: Exp<f64>,
    rng: R,
    minimizer: BoundedMinimizer,
}

impl PerturbedLeaderCalibrator<StdRng> {
    pub fn new(params: MomentumParams, eta: f64, seed: Option<u64>) -> Result<Self, StrategyError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params, eta, rng)
    }
}

impl<R: Rng> PerturbedLeaderCalibrator<R> {
    pub fn with_rng(params: MomentumParams, eta: f64, rng: R) -> Result<Self, StrategyError> {
        if !eta.is_finite() || eta <= 0.0 {
            return Err(StrategyError::InvalidEta(eta));
        }
        let perturbation = Exp::new(1.0 / eta).map_err(|_| StrategyError::InvalidEta(eta))?;

        Ok(Self {
            params,
            perturbation,
            rng,
            minimizer: BoundedMinimizer::new(ALPHA_MIN, ALPHA_MAX),
        })
    }

    pub fn params(&self) -> &MomentumParams {
        &self.params
    }

    pub fn calibrate(&mut self, history: &RelativeHistory) -> Calibration {
        let sigma = self.perturbation.sample(&mut self.rng);
        self.calibrate_with_sigma(history, sigma)
    }

    pub fn calibrate_with_sigma(&self, history: &RelativeHistory, sigma: f64) -> Calibration {
        let params = self.params;
        let minimum = self.minimizer.minimize(
            |alpha| retrospective_objective(history, alpha, sigma, &params),
            CALIBRATION_START,
        );

        if !minimum.converged {
            warn!(
                steps = history.len(),
                alpha = minimum.x,
                sigma,
                iterations = minimum.iterations,
                "decay calibration did not converge; using last iterate"
            );
        }

        Calibration {
            alpha: minimum.x,
            sigma,
            objective: minimum.value,
            converged: minimum.converged,
            iterations: minimum.iterations,
            evaluations: minimum.evaluations,
        }
    }
}
