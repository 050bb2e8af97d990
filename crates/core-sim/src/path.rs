use crate::error::SimError;

/// Read-only, step-indexed access to per-asset prices.
pub trait PriceSource {
    fn n_assets(&self) -> usize;

    fn n_steps(&self) -> usize;

    /// Prices at `step`, or [`SimError::StepOutOfRange`] when `step >= n_steps`.
    fn price(&self, step: usize) -> Result<&[f64], SimError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricePath {
    n_assets: usize,
    rows: Vec<Vec<f64>>,
}

impl PricePath {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SimError> {
        let n_assets = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            Some(_) => return Err(SimError::InvalidConfig("price rows must not be empty")),
            None => return Err(SimError::InvalidConfig("price path must have at least one step")),
        };

        for (step, row) in rows.iter().enumerate() {
            if row.len() != n_assets {
                return Err(SimError::DimensionMismatch {
                    expected: n_assets,
                    actual: row.len(),
                });
            }
            if let Some((asset, &price)) = row
                .iter()
                .enumerate()
                .find(|(_, price)| !price.is_finite() || **price <= 0.0)
            {
                return Err(SimError::InvalidPrice { step, asset, price });
            }
        }

        Ok(Self { n_assets, rows })
    }

    /// Step `t` is `initial` compounded by `relatives[..t]`.
    pub fn from_relatives(initial: Vec<f64>, relatives: &[Vec<f64>]) -> Result<Self, SimError> {
        let mut rows = Vec::with_capacity(relatives.len() + 1);
        let mut current = initial;
        for relative in relatives {
            if relative.len() != current.len() {
                return Err(SimError::DimensionMismatch {
                    expected: current.len(),
                    actual: relative.len(),
                });
            }
            let next = current.iter().zip(relative).map(|(p, r)| p * r).collect();
            rows.push(std::mem::replace(&mut current, next));
        }
        rows.push(current);

        Self::from_rows(rows)
    }

    pub(crate) fn from_validated_rows(n_assets: usize, rows: Vec<Vec<f64>>) -> Self {
        Self { n_assets, rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

impl PriceSource for PricePath {
    fn n_assets(&self) -> usize {
        self.n_assets
    }

    fn n_steps(&self) -> usize {
        self.rows.len()
    }

    fn price(&self, step: usize) -> Result<&[f64], SimError> {
        self.rows
            .get(step)
            .map(Vec::as_slice)
            .ok_or(SimError::StepOutOfRange {
                step,
                n_steps: self.rows.len(),
            })
    }
}
