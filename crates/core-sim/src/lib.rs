mod config;
mod environment;
mod error;
mod generators;
mod ledger;
mod path;

pub use config::EnvironmentConfig;
pub use environment::AdversarialEnvironment;
pub use error::SimError;
pub use generators::AdversarialPriceGenerator;
pub use ledger::{dot, Ledger, INITIAL_CASH};
pub use path::{PricePath, PriceSource};

#[cfg(test)]
mod tests {
    use super::{EnvironmentConfig, Ledger, INITIAL_CASH};

    #[test]
    fn environment_config_defaults_match_generator_shape() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.n_stocks, 10);
        assert_eq!(config.n_steps, 100);
        assert_eq!(config.seed, None);
        assert_eq!(config.initial_price, 100.0);
        assert_eq!(config.momentum_factor, 0.95);
        assert_eq!(config.noise_low, -0.02);
        assert_eq!(config.noise_high, 0.021);
        assert_eq!(config.shift_amplitude, 0.01);
        assert_eq!(config.price_floor, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trader_ledger_starts_with_initial_cash() {
        let ledger = Ledger::new(5, INITIAL_CASH);
        assert_eq!(ledger.cash(), 1_000.0);
        assert!(ledger.position().iter().all(|held| *held == 0.0));
    }
}
