use std::{
    env, fmt,
    time::{SystemTime, UNIX_EPOCH},
};

const DEFAULT_N_STOCKS: usize = 5;
const DEFAULT_N_STEPS: usize = 1_000;
const DEFAULT_LOOKBACK: usize = strategy::config::DEFAULT_LOOKBACK;
const DEFAULT_TEMPERATURE: f64 = strategy::config::DEFAULT_TEMPERATURE;
const DEFAULT_ETA: f64 = strategy::config::DEFAULT_ETA;
const DEFAULT_STATIC_ALPHAS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
const DEFAULT_DEBUG: bool = false;
const DEFAULT_INCLUDE_RANDOM: bool = false;
const DEFAULT_REPLAY_OUTPUT_PATH: &str = "artifacts/wealth.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub n_stocks: usize,
    pub n_steps: usize,
    pub seed: u64,
    pub lookback: usize,
    pub temperature: f64,
    pub eta: f64,
    pub static_alphas: Vec<f64>,
    pub debug: bool,
    pub include_random: bool,
    pub replay_output_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNStocks,
    InvalidNSteps,
    InvalidSeed,
    InvalidLookback,
    InvalidTemperature,
    InvalidEta,
    InvalidStaticAlphas,
    InvalidDebug,
    InvalidIncludeRandom,
    InvalidReplayOutputPath,
    NonUnicode(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNStocks => write!(f, "LAB_N_STOCKS must be a positive integer"),
            Self::InvalidNSteps => write!(f, "LAB_N_STEPS must be a positive integer"),
            Self::InvalidSeed => write!(f, "LAB_SEED must be an unsigned 64-bit integer"),
            Self::InvalidLookback => write!(f, "LAB_LOOKBACK must be a positive integer"),
            Self::InvalidTemperature => write!(f, "LAB_TEMPERATURE must be a finite number"),
            Self::InvalidEta => write!(f, "LAB_ETA must be a finite positive number"),
            Self::InvalidStaticAlphas => write!(
                f,
                "LAB_STATIC_ALPHAS must be a comma-separated list of decays in [0.01, 1]"
            ),
            Self::InvalidDebug => write!(f, "LAB_DEBUG must be true or false"),
            Self::InvalidIncludeRandom => write!(f, "LAB_INCLUDE_RANDOM must be true or false"),
            Self::InvalidReplayOutputPath => {
                write!(f, "LAB_REPLAY_OUTPUT must not be empty or whitespace")
            }
            Self::NonUnicode(key) => write!(f, "{key} contains non-unicode data"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let n_stocks = parse_positive_env("LAB_N_STOCKS", DEFAULT_N_STOCKS, ConfigError::InvalidNStocks)?;
        let n_steps = parse_positive_env("LAB_N_STEPS", DEFAULT_N_STEPS, ConfigError::InvalidNSteps)?;

        let seed = match read_env("LAB_SEED")? {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidSeed)?,
            None => seed_from_clock(),
        };

        let lookback =
            parse_positive_env("LAB_LOOKBACK", DEFAULT_LOOKBACK, ConfigError::InvalidLookback)?;

        let temperature = match read_env("LAB_TEMPERATURE")? {
            Some(value) => match value.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => parsed,
                _ => return Err(ConfigError::InvalidTemperature),
            },
            None => DEFAULT_TEMPERATURE,
        };

        let eta = match read_env("LAB_ETA")? {
            Some(value) => match value.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => parsed,
                _ => return Err(ConfigError::InvalidEta),
            },
            None => DEFAULT_ETA,
        };

        let static_alphas = match read_env("LAB_STATIC_ALPHAS")? {
            Some(value) => parse_alphas(&value).ok_or(ConfigError::InvalidStaticAlphas)?,
            None => DEFAULT_STATIC_ALPHAS.to_vec(),
        };

        let debug = match read_env("LAB_DEBUG")? {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidDebug)?,
            None => DEFAULT_DEBUG,
        };

        let include_random = match read_env("LAB_INCLUDE_RANDOM")? {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidIncludeRandom)?,
            None => DEFAULT_INCLUDE_RANDOM,
        };

        let replay_output_path = match read_env("LAB_REPLAY_OUTPUT")? {
            Some(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidReplayOutputPath);
                }
                value
            }
            None => DEFAULT_REPLAY_OUTPUT_PATH.to_owned(),
        };

        Ok(Self {
            n_stocks,
            n_steps,
            seed,
            lookback,
            temperature,
            eta,
            static_alphas,
            debug,
            include_random,
            replay_output_path,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_positive_env(
    key: &'static str,
    default_value: usize,
    invalid_error: ConfigError,
) -> Result<usize, ConfigError> {
    match read_env(key)? {
        Some(value) => match value.parse::<usize>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(invalid_error),
        },
        None => Ok(default_value),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_alphas(value: &str) -> Option<Vec<f64>> {
    let alphas = value
        .split(',')
        .map(|item| item.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let in_range = alphas
        .iter()
        .all(|alpha| (strategy::ALPHA_MIN..=strategy::ALPHA_MAX).contains(alpha));
    if alphas.is_empty() || !in_range {
        return None;
    }
    Some(alphas)
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use super::{Config, ConfigError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());
    const KEYS: [&str; 10] = [
        "LAB_N_STOCKS",
        "LAB_N_STEPS",
        "LAB_SEED",
        "LAB_LOOKBACK",
        "LAB_TEMPERATURE",
        "LAB_ETA",
        "LAB_STATIC_ALPHAS",
        "LAB_DEBUG",
        "LAB_INCLUDE_RANDOM",
        "LAB_REPLAY_OUTPUT",
    ];

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> Vec<EnvVarGuard> {
        KEYS.iter().map(|key| EnvVarGuard::unset(key)).collect()
    }

    #[test]
    fn defaults_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.n_stocks, 5);
        assert_eq!(config.n_steps, 1_000);
        assert_eq!(config.lookback, 30);
        assert_eq!(config.temperature, 30.0);
        assert_eq!(config.eta, 1.0);
        assert_eq!(config.static_alphas, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!(!config.debug);
        assert!(!config.include_random);
        assert_eq!(config.replay_output_path, "artifacts/wealth.csv");
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guards = [
            EnvVarGuard::set("LAB_N_STOCKS", "3"),
            EnvVarGuard::set("LAB_SEED", "1234"),
            EnvVarGuard::set("LAB_STATIC_ALPHAS", "0.5, 0.9"),
            EnvVarGuard::set("LAB_DEBUG", "true"),
            EnvVarGuard::set("LAB_ETA", "2.5"),
        ];

        let config = Config::from_env().unwrap();

        assert_eq!(config.n_stocks, 3);
        assert_eq!(config.seed, 1234);
        assert_eq!(config.static_alphas, vec![0.5, 0.9]);
        assert!(config.debug);
        assert_eq!(config.eta, 2.5);
    }

    #[test]
    fn rejects_zero_stocks() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set("LAB_N_STOCKS", "0");

        assert_eq!(Config::from_env().unwrap_err(), ConfigError::InvalidNStocks);
    }

    #[test]
    fn rejects_alpha_outside_decay_band() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set("LAB_STATIC_ALPHAS", "0.5,1.5");

        assert_eq!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidStaticAlphas
        );
    }

    #[test]
    fn rejects_non_positive_eta() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set("LAB_ETA", "0");

        assert_eq!(Config::from_env().unwrap_err(), ConfigError::InvalidEta);
    }

    #[test]
    fn returns_error_for_whitespace_replay_output_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set("LAB_REPLAY_OUTPUT", "   ");

        assert_eq!(
            Config::from_env().unwrap_err(),
            ConfigError::InvalidReplayOutputPath
        );
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_seed() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(
            "LAB_SEED",
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        assert_eq!(
            Config::from_env().unwrap_err(),
            ConfigError::NonUnicode("LAB_SEED")
        );
    }
}
