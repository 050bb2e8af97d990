use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentConfig {
    pub n_stocks: usize,
    pub n_steps: usize,
    pub seed: Option<u64>,
    pub initial_price: f64,
    pub momentum_factor: f64,
    pub noise_low: f64,
    pub noise_high: f64,
    pub shift_amplitude: f64,
    pub price_floor: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            n_stocks: 10,
            n_steps: 100,
            seed: None,
            initial_price: 100.0,
            momentum_factor: 0.95,
            noise_low: -0.02,
            noise_high: 0.021,
            shift_amplitude: 0.01,
            price_floor: 1.0,
        }
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.n_stocks == 0 {
            return Err(SimError::InvalidConfig("n_stocks must be at least 1"));
        }
        if self.n_steps == 0 {
            return Err(SimError::InvalidConfig("n_steps must be at least 1"));
        }
        if !self.initial_price.is_finite() || self.initial_price <= 0.0 {
            return Err(SimError::InvalidConfig(
                "initial_price must be finite and positive",
            ));
        }
        if !self.price_floor.is_finite() || self.price_floor <= 0.0 {
            return Err(SimError::InvalidConfig(
                "price_floor must be finite and positive",
            ));
        }
        if !self.momentum_factor.is_finite() {
            return Err(SimError::InvalidConfig("momentum_factor must be finite"));
        }
        if !self.noise_low.is_finite()
            || !self.noise_high.is_finite()
            || self.noise_low >= self.noise_high
        {
            return Err(SimError::InvalidConfig(
                "noise bounds must be finite with noise_low < noise_high",
            ));
        }
        if !self.shift_amplitude.is_finite() || self.shift_amplitude <= 0.0 {
            return Err(SimError::InvalidConfig(
                "shift_amplitude must be finite and positive",
            ));
        }

        Ok(())
    }
}
