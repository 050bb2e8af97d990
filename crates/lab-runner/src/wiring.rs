use core_sim::{AdversarialEnvironment, EnvironmentConfig, SimError};
use strategy::{
    FtplConfig, FtplMomentumTrader, MomentumConfig, MomentumTrader, RandomConfig, RandomTrader,
    StrategyError, Trader, Verbosity,
};

use crate::config::Config;

// Offsets keep trader streams apart from the price stream under one run seed.
const FTPL_SEED_OFFSET: u64 = 1;
const RANDOM_SEED_OFFSET: u64 = 2;

pub type Lineup = Vec<Box<dyn Trader + Send>>;

pub fn build_environment(config: &Config) -> Result<AdversarialEnvironment, SimError> {
    AdversarialEnvironment::new(EnvironmentConfig {
        n_stocks: config.n_stocks,
        n_steps: config.n_steps,
        seed: Some(config.seed),
        ..EnvironmentConfig::default()
    })
}

/// The FTPL trader first, one static trader per configured decay, then the
/// optional random baseline.
pub fn build_lineup(config: &Config) -> Result<Lineup, StrategyError> {
    let verbosity = Verbosity::from_debug_flag(config.debug);
    let mut lineup: Lineup = Vec::with_capacity(config.static_alphas.len() + 2);

    lineup.push(Box::new(FtplMomentumTrader::new(
        config.n_stocks,
        FtplConfig {
            lookback: config.lookback,
            temperature: config.temperature,
            eta: config.eta,
            seed: Some(config.seed.wrapping_add(FTPL_SEED_OFFSET)),
            verbosity,
        },
    )?));

    for &alpha in &config.static_alphas {
        lineup.push(Box::new(MomentumTrader::new(
            config.n_stocks,
            MomentumConfig {
                lookback: config.lookback,
                temperature: config.temperature,
                alpha,
                verbosity,
            },
        )?));
    }

    if config.include_random {
        lineup.push(Box::new(RandomTrader::new(
            config.n_stocks,
            RandomConfig {
                seed: Some(config.seed.wrapping_add(RANDOM_SEED_OFFSET)),
            },
        )?));
    }

    Ok(lineup)
}
