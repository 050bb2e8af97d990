use std::f64::consts::PI;

use rand::Rng;

use crate::config::EnvironmentConfig;
use crate::error::SimError;
use crate::path::PricePath;

/// Price step: `(1 + noise + shift) * (1 + momentum_factor * carry)`, floored.
#[derive(Debug, Clone, Copy)]
pub struct AdversarialPriceGenerator {
    config: EnvironmentConfig,
}

impl AdversarialPriceGenerator {
    pub fn new(config: EnvironmentConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> PricePath {
        let n_steps = self.config.n_steps;
        let n_stocks = self.config.n_stocks;
        let mut rows = vec![vec![self.config.initial_price; n_stocks]; n_steps];

        // Stock-major draw order.
        for stock in 0..n_stocks {
            let mut price = self.config.initial_price;
            let mut carry = 0.0;

            for (t, row) in rows.iter_mut().enumerate().skip(1) {
                let noise = rng.gen_range(self.config.noise_low..self.config.noise_high);
                let phase = (2.0 * PI * t as f64 / n_steps as f64).sin();
                let shift = phase
                    * rng.gen_range(-self.config.shift_amplitude..self.config.shift_amplitude);

                price *= (1.0 + noise + shift) * (1.0 + self.config.momentum_factor * carry);
                carry = noise + shift;
                price = price.max(self.config.price_floor);

                row[stock] = price;
            }
        }

        PricePath::from_validated_rows(n_stocks, rows)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::AdversarialPriceGenerator;
    use crate::config::EnvironmentConfig;
    use crate::error::SimError;
    use crate::path::PriceSource;

    fn config(n_stocks: usize, n_steps: usize) -> EnvironmentConfig {
        EnvironmentConfig {
            n_stocks,
            n_steps,
            ..EnvironmentConfig::default()
        }
    }

    #[test]
    fn seeded_generator_is_deterministic() {
        let generator = AdversarialPriceGenerator::new(config(3, 50)).unwrap();

        let path_a = generator.generate(&mut StdRng::seed_from_u64(42));
        let path_b = generator.generate(&mut StdRng::seed_from_u64(42));

        assert_eq!(path_a, path_b);
    }

    #[test]
    fn first_row_holds_initial_price_for_every_asset() {
        let generator = AdversarialPriceGenerator::new(config(4, 10)).unwrap();
        let path = generator.generate(&mut StdRng::seed_from_u64(1));

        assert_eq!(path.price(0).unwrap(), &[100.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn prices_never_drop_below_floor() {
        let generator = AdversarialPriceGenerator::new(EnvironmentConfig {
            n_stocks: 2,
            n_steps: 500,
            initial_price: 1.5,
            noise_low: -0.5,
            noise_high: 0.0,
            ..EnvironmentConfig::default()
        })
        .unwrap();
        let path = generator.generate(&mut StdRng::seed_from_u64(3));

        for step in 0..path.n_steps() {
            for &price in path.price(step).unwrap() {
                assert!(price >= 1.0, "price {price} fell below floor at step {step}");
            }
        }
    }

    #[test]
    fn rejects_empty_sampling_ranges() {
        let inverted_noise = EnvironmentConfig {
            noise_low: 0.02,
            noise_high: 0.02,
            ..EnvironmentConfig::default()
        };
        let no_shift = EnvironmentConfig {
            shift_amplitude: 0.0,
            ..EnvironmentConfig::default()
        };

        assert!(matches!(
            AdversarialPriceGenerator::new(inverted_noise),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            AdversarialPriceGenerator::new(no_shift),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn step_changes_stay_within_noise_and_momentum_envelope() {
        let generator = AdversarialPriceGenerator::new(config(1, 200)).unwrap();
        let path = generator.generate(&mut StdRng::seed_from_u64(9));

        // |noise + shift| <= 0.031, so one step moves at most
        // (1.031) * (1 + 0.95 * 0.031) and at least (0.969) * (1 - 0.95 * 0.031).
        let upper = 1.031 * (1.0 + 0.95 * 0.031) + 1e-12;
        let lower = 0.969 * (1.0 - 0.95 * 0.031) - 1e-12;
        for step in 1..path.n_steps() {
            let ratio = path.price(step).unwrap()[0] / path.price(step - 1).unwrap()[0];
            assert!(ratio <= upper && ratio >= lower, "ratio {ratio} at step {step}");
        }
    }
}
