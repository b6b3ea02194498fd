//! Queue configuration
//!
//! Values are layered: built-in defaults, then environment (a `.env` file is
//! loaded by the binaries before this runs), then command-line overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

/// Participants shown when nothing else is configured
pub const DEFAULT_ROSTER: [&str; 11] = [
    "Alberito",
    "Tubarão",
    "É o Jeff",
    "Fabão",
    "Negão",
    "Fabricio Bezerro",
    "Gaibriel",
    "Webson Siacalme",
    "Ramun",
    "Juno Severino",
    "Auricélia",
];

/// Pause before a shuffle is revealed
pub const DEFAULT_DELAY_MS: u64 = 800;

pub const ENV_ROSTER: &str = "QUEUE_ROSTER";
pub const ENV_DELAY_MS: &str = "QUEUE_DELAY_MS";
pub const ENV_SEED: &str = "QUEUE_SEED";

/// Resolved configuration for one widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub roster: Vec<String>,
    pub delay_ms: u64,
    pub seed: Option<u64>,
}

/// Command-line values that win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Comma separated participant names
    pub roster: Option<String>,
    /// JSON file holding an array of participant names
    pub roster_file: Option<PathBuf>,
    pub delay_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect(),
            delay_ms: DEFAULT_DELAY_MS,
            seed: None,
        }
    }
}

impl QueueConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> SharedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` yields for the `QUEUE_*` keys
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(roster) = lookup(ENV_ROSTER) {
            config.roster = parse_roster_list(&roster);
        }
        if let Some(delay) = lookup(ENV_DELAY_MS) {
            config.delay_ms = parse_number(ENV_DELAY_MS, &delay)?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = Some(parse_number(ENV_SEED, &seed)?);
        }

        Ok(config)
    }

    /// Apply command-line overrides; a roster file wins over an inline list
    pub fn apply(mut self, overrides: ConfigOverrides) -> SharedResult<Self> {
        if let Some(roster) = overrides.roster {
            self.roster = parse_roster_list(&roster);
        }
        if let Some(path) = overrides.roster_file {
            self.roster = load_roster_file(&path)?;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.delay_ms = delay_ms;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        Ok(self)
    }
}

/// Split a comma separated list, dropping empty entries
pub fn parse_roster_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a JSON array of names
pub fn load_roster_file(path: &Path) -> SharedResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| SharedError::ConfigFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str::<Vec<String>>(&raw).map_err(|e| SharedError::ConfigFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_number(field: &str, raw: &str) -> SharedResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| SharedError::invalid_config(field, raw))
}
