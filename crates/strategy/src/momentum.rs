use crate::error::StrategyError;

pub const ALPHA_MIN: f64 = 0.01;
pub const ALPHA_MAX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumParams {
    pub lookback: usize,
    pub temperature: f64,
}

impl MomentumParams {
    pub fn new(lookback: usize, temperature: f64) -> Result<Self, StrategyError> {
        if lookback == 0 {
            return Err(StrategyError::InvalidLookback);
        }
        if !temperature.is_finite() {
            return Err(StrategyError::InvalidTemperature(temperature));
        }

        Ok(Self {
            lookback,
            temperature,
        })
    }
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            lookback: 30,
            temperature: 30.0,
        }
    }
}

/// Index `j` holds the relative ending at step `j + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeHistory {
    n_assets: usize,
    last_price: Option<Vec<f64>>,
    relatives: Vec<Vec<f64>>,
}

impl RelativeHistory {
    pub fn new(n_assets: usize) -> Self {
        Self {
            n_assets,
            last_price: None,
            relatives: Vec::new(),
        }
    }

    pub fn from_relatives(n_assets: usize, relatives: Vec<Vec<f64>>) -> Result<Self, StrategyError> {
        if let Some(bad) = relatives.iter().find(|relative| relative.len() != n_assets) {
            return Err(core_sim::SimError::DimensionMismatch {
                expected: n_assets,
                actual: bad.len(),
            }
            .into());
        }

        Ok(Self {
            n_assets,
            last_price: None,
            relatives,
        })
    }

    pub fn observe(&mut self, prices: &[f64]) -> Result<(), StrategyError> {
        if prices.len() != self.n_assets {
            return Err(core_sim::SimError::DimensionMismatch {
                expected: self.n_assets,
                actual: prices.len(),
            }
            .into());
        }

        if let Some(previous) = self.last_price.as_deref() {
            let relative = prices
                .iter()
                .zip(previous)
                .map(|(now, before)| now / before)
                .collect();
            self.relatives.push(relative);
        }
        self.last_price = Some(prices.to_vec());

        Ok(())
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Step index the next observed price belongs to.
    pub fn next_step(&self) -> usize {
        match self.last_price {
            Some(_) => self.relatives.len() + 1,
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.relatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relatives.is_empty()
    }

    pub fn relatives(&self) -> &[Vec<f64>] {
        &self.relatives
    }

    pub fn allocation(
        &self,
        step: usize,
        alpha: f64,
        params: &MomentumParams,
    ) -> Result<Vec<f64>, StrategyError> {
        if step > self.relatives.len() {
            return Err(StrategyError::StepBeyondHistory {
                step,
                available: self.relatives.len(),
            });
        }
        Ok(self.allocation_unchecked(step, alpha, params))
    }

    // Lag 1 is the relative ending at the current step.
    pub fn current_allocation(&self, alpha: f64, params: &MomentumParams) -> Vec<f64> {
        self.allocation_unchecked(self.relatives.len(), alpha, params)
    }

    pub(crate) fn allocation_unchecked(
        &self,
        step: usize,
        alpha: f64,
        params: &MomentumParams,
    ) -> Vec<f64> {
        let window = params.lookback.min(step);
        let mut raw = vec![0.0; self.n_assets];

        for lag in 1..=window {
            let weight = alpha.powi(lag as i32);
            for (acc, relative) in raw.iter_mut().zip(&self.relatives[step - lag]) {
                *acc += weight * relative;
            }
        }

        centered_softmax(&mut raw, params.temperature);
        raw
    }
}

/// In-place `exp(T * (x - mean(x))) / sum`.
pub fn centered_softmax(values: &mut [f64], temperature: f64) {
    if values.is_empty() {
        return;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    for value in values.iter_mut() {
        *value = (temperature * (*value - mean)).exp();
    }
    let total: f64 = values.iter().sum();
    for value in values.iter_mut() {
        *value /= total;
    }
}
