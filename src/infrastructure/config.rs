//! Configuration management

use crate::formula::Layout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the formula home
pub const HOME_ENV: &str = "FORMULA_HOME";

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "FORMULA_LOG";

/// Environment variable enabling team session checks
pub const TEAM_ENV: &str = "FORMULA_TEAM";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Formula home root
    pub home: PathBuf,
    /// Log level
    pub log_level: String,
    /// Require a valid team session before running formulas
    pub team: bool,
}

impl Default for Config {
    fn default() -> Self {
        let user_home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            home: user_home.join(".formula"),
            log_level: "info".to_string(),
            team: false,
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(home) = lookup(HOME_ENV).filter(|h| !h.is_empty()) {
            config.home = PathBuf::from(home);
        }
        if let Some(level) = lookup(LOG_ENV).filter(|l| !l.is_empty()) {
            config.log_level = level;
        }
        if let Some(team) = lookup(TEAM_ENV) {
            config.team = matches!(team.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    /// Filesystem layout under the configured home
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::new(&self.home)
    }
}
