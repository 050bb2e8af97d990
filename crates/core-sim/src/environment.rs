use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EnvironmentConfig;
use crate::error::SimError;
use crate::generators::AdversarialPriceGenerator;
use crate::path::{PricePath, PriceSource};

/// Seeded resets reproduce the path; unseeded resets draw from OS entropy.
#[derive(Debug, Clone)]
pub struct AdversarialEnvironment {
    config: EnvironmentConfig,
    generator: AdversarialPriceGenerator,
    path: PricePath,
}

impl AdversarialEnvironment {
    pub fn new(config: EnvironmentConfig) -> Result<Self, SimError> {
        let generator = AdversarialPriceGenerator::new(config)?;
        let path = Self::generate(&generator, config.seed);

        Ok(Self {
            config,
            generator,
            path,
        })
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn get_price(&self, step: usize) -> Result<&[f64], SimError> {
        self.path.price(step)
    }

    pub fn reset(&mut self) {
        self.path = Self::generate(&self.generator, self.config.seed);
    }

    pub fn path(&self) -> &PricePath {
        &self.path
    }

    pub fn into_path(self) -> PricePath {
        self.path
    }

    fn generate(generator: &AdversarialPriceGenerator, seed: Option<u64>) -> PricePath {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        generator.generate(&mut rng)
    }
}

impl PriceSource for AdversarialEnvironment {
    fn n_assets(&self) -> usize {
        self.config.n_stocks
    }

    fn n_steps(&self) -> usize {
        self.config.n_steps
    }

    fn price(&self, step: usize) -> Result<&[f64], SimError> {
        self.path.price(step)
    }
}
