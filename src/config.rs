//! Table configuration: defaults, an optional TOML file and `HOLDEM_*` environment overrides.
//!
//! Resolution order is default, then file (path in `HOLDEM_CONFIG`), then environment.
//! ```
//! use holdem_engine::config::{TableConfig, ValueSource};
//!
//! let resolved = TableConfig::resolve(|key| match key {
//!     "HOLDEM_BIG_BLIND" => Some("50".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//! assert_eq!(resolved.config.big_blind, 50);
//! assert_eq!(resolved.sources.big_blind, ValueSource::Env);
//! assert_eq!(resolved.sources.small_blind, ValueSource::Default);
//! ```

use crate::game::Seat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const ENV_CONFIG: &str = "HOLDEM_CONFIG";
pub const ENV_SMALL_BLIND: &str = "HOLDEM_SMALL_BLIND";
pub const ENV_BIG_BLIND: &str = "HOLDEM_BIG_BLIND";
pub const ENV_STARTING_STACK: &str = "HOLDEM_STARTING_STACK";
pub const ENV_MAX_SEATS: &str = "HOLDEM_MAX_SEATS";
pub const ENV_SEED: &str = "HOLDEM_SEED";

/// Two hole cards per seat plus a full board must fit in one deck.
pub const SEAT_LIMIT: usize = 23;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    pub starting_stack: u64,
    pub max_seats: usize,
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { small_blind: 10, big_blind: 20, starting_stack: 1000, max_seats: 9, seed: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub starting_stack: ValueSource,
    pub max_seats: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            starting_stack: ValueSource::Default,
            max_seats: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {key}")]
    BadValue { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Every key is optional; missing keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    small_blind: Option<u64>,
    big_blind: Option<u64>,
    starting_stack: Option<u64>,
    max_seats: Option<usize>,
    seed: Option<u64>,
}

impl TableConfig {
    /// Resolve from the process environment.
    pub fn load() -> Result<ConfigResolved, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve with a custom variable lookup.
    pub fn resolve<F>(lookup: F) -> Result<ConfigResolved, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = TableConfig::default();
        let mut sources = ConfigSources::default();

        if let Some(path) = lookup(ENV_CONFIG).filter(|p| !p.is_empty()) {
            let file = read_file(Path::new(&path))?;
            cfg.apply_file(file, &mut sources);
        }

        if let Some(v) = env_value(&lookup, ENV_SMALL_BLIND)? {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::Env;
        }
        if let Some(v) = env_value(&lookup, ENV_BIG_BLIND)? {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::Env;
        }
        if let Some(v) = env_value(&lookup, ENV_STARTING_STACK)? {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::Env;
        }
        if let Some(v) = env_value(&lookup, ENV_MAX_SEATS)? {
            cfg.max_seats = v;
            sources.max_seats = ValueSource::Env;
        }
        if let Some(v) = env_value(&lookup, ENV_SEED)? {
            cfg.seed = Some(v);
            sources.seed = ValueSource::Env;
        }

        cfg.validate()?;
        Ok(ConfigResolved { config: cfg, sources })
    }

    /// Parse a TOML document over the defaults, without environment overrides.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(s)?;
        let mut cfg = TableConfig::default();
        cfg.apply_file(file, &mut ConfigSources::default());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 {
            return Err(ConfigError::Invalid("small_blind must be > 0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(format!(
                "small_blind {} exceeds big_blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be > 0".into()));
        }
        if !(2..=SEAT_LIMIT).contains(&self.max_seats) {
            return Err(ConfigError::Invalid(format!(
                "max_seats must be between 2 and {SEAT_LIMIT}, got {}",
                self.max_seats
            )));
        }
        Ok(())
    }

    /// `n` seats named `p0..`, each with the starting stack.
    pub fn seats(&self, n: usize) -> Result<Vec<Seat>, ConfigError> {
        if !(2..=self.max_seats).contains(&n) {
            return Err(ConfigError::Invalid(format!(
                "{n} players requested, table seats 2..={}",
                self.max_seats
            )));
        }
        Ok((0..n)
            .map(|i| Seat::new(format!("p{i}"), format!("Player {}", i + 1), self.starting_stack))
            .collect())
    }

    fn apply_file(&mut self, file: FileConfig, sources: &mut ConfigSources) {
        if let Some(v) = file.small_blind {
            self.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = file.big_blind {
            self.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = file.starting_stack {
            self.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = file.max_seats {
            self.max_seats = v;
            sources.max_seats = ValueSource::File;
        }
        if let Some(v) = file.seed {
            self.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}

fn env_value<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::BadValue { key, value: raw }),
    }
}
