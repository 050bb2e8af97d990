pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod replay;

pub use engine::{run_simulation, RunReport, SimEngine, WealthRecord};
pub use error::RuntimeError;

#[cfg(test)]
mod tests {
    use core_sim::{AdversarialEnvironment, EnvironmentConfig};
    use strategy::{MomentumConfig, MomentumTrader, RandomConfig, RandomTrader, Trader};

    use crate::engine::run_simulation;
    use crate::logging::NullRunLogWriter;

    #[test]
    fn traders_share_one_environment_without_interfering() {
        let env = AdversarialEnvironment::new(EnvironmentConfig {
            n_stocks: 3,
            n_steps: 60,
            seed: Some(17),
            ..EnvironmentConfig::default()
        })
        .unwrap();

        let mut first = MomentumTrader::new(3, MomentumConfig::default()).unwrap();
        let mut random = RandomTrader::new(3, RandomConfig { seed: Some(1) }).unwrap();
        let mut second = MomentumTrader::new(3, MomentumConfig::default()).unwrap();

        let a = run_simulation(&env, &mut first, &mut NullRunLogWriter).unwrap();
        run_simulation(&env, &mut random, &mut NullRunLogWriter).unwrap();
        let b = run_simulation(&env, &mut second, &mut NullRunLogWriter).unwrap();

        assert_eq!(a.records, b.records);
        assert_eq!(first.ledger(), second.ledger());
    }

    #[test]
    fn run_report_serializes_without_records() {
        let env = AdversarialEnvironment::new(EnvironmentConfig {
            n_stocks: 2,
            n_steps: 5,
            seed: Some(3),
            ..EnvironmentConfig::default()
        })
        .unwrap();
        let mut trader = MomentumTrader::new(2, MomentumConfig::default()).unwrap();

        let report = run_simulation(&env, &mut trader, &mut NullRunLogWriter).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["trader"], "momentum(alpha=0.5)");
        assert_eq!(json["summary"]["steps"], 5);
        assert!(json.get("records").is_none());
    }
}
