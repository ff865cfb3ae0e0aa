//! Application configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `BOSSFIGHT_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `BOSSFIGHT_RULES__VENOM_CHANCE=0.5`).

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::CombatRules;
use crate::roles::{default_party, HeroSpec, MAX_PARTY};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOSSFIGHT_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// SQLite path; in-memory when absent
    pub database: Option<String>,
    /// Round cap for headless runs
    pub max_rounds: u32,
    /// Where to write the JSON-lines battle log
    pub event_log: Option<PathBuf>,
    pub party: Vec<HeroSpec>,
    pub boss_name: String,
    pub rules: CombatRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            database: None,
            max_rounds: 200,
            event_log: None,
            party: default_party(),
            boss_name: "Dragon".to_string(),
            rules: CombatRules::default(),
        }
    }
}

impl Config {
    /// Base figment: defaults, optional TOML file, environment
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from all layers
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        let config: Config = Self::figment(file).extract()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Check values the type system can't
    pub fn validate(&self) -> Result<(), String> {
        if self.party.is_empty() {
            return Err("party must have at least one hero".into());
        }
        if self.party.len() > MAX_PARTY {
            return Err(format!("party can have at most {} heroes", MAX_PARTY));
        }
        if self.party.iter().any(|h| h.role == crate::combat::Role::Boss) {
            return Err("boss is not a party role".into());
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be positive".into());
        }
        self.rules.validate()
    }
}
