use crate::error::SimError;

pub const INITIAL_CASH: f64 = 1_000.0;

/// Positions may be short or fractional; trades fill in full at no cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    cash: f64,
    position: Vec<f64>,
}

impl Ledger {
    pub fn new(n_assets: usize, cash: f64) -> Self {
        Self {
            cash,
            position: vec![0.0; n_assets],
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn n_assets(&self) -> usize {
        self.position.len()
    }

    /// Mark-to-market wealth: `cash + dot(position, prices)`.
    pub fn wealth(&self, prices: &[f64]) -> Result<f64, SimError> {
        self.check_len(prices.len())?;
        Ok(self.cash + dot(&self.position, prices))
    }

    pub fn target_position(&self, allocation: &[f64], prices: &[f64]) -> Result<Vec<f64>, SimError> {
        self.check_len(allocation.len())?;
        let wealth = self.wealth(prices)?;

        Ok(allocation
            .iter()
            .zip(prices)
            .map(|(weight, price)| wealth * weight / price)
            .collect())
    }

    pub fn rebalance_trade(&self, allocation: &[f64], prices: &[f64]) -> Result<Vec<f64>, SimError> {
        let target = self.target_position(allocation, prices)?;

        Ok(target
            .iter()
            .zip(&self.position)
            .map(|(target, held)| target - held)
            .collect())
    }

    pub fn apply(&mut self, trade: &[f64], prices: &[f64]) -> Result<f64, SimError> {
        self.check_len(trade.len())?;
        self.check_len(prices.len())?;

        self.cash -= dot(trade, prices);
        for (held, delta) in self.position.iter_mut().zip(trade) {
            *held += delta;
        }

        self.wealth(prices)
    }

    fn check_len(&self, actual: usize) -> Result<(), SimError> {
        if actual != self.position.len() {
            return Err(SimError::DimensionMismatch {
                expected: self.position.len(),
                actual,
            });
        }
        Ok(())
    }
}

pub fn dot(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).map(|(l, r)| l * r).sum()
}
