//! Slotbook configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{SlotbookError, SlotbookResult};
use crate::preferences::BookingPreferences;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Global configuration at ~/.config/slotbook/config.toml
///
/// Any key can be overridden from the environment with a `SLOTBOOK_` prefix,
/// using `__` for nesting (e.g. `SLOTBOOK_PREFERENCES__BUFFER_TIME_MINUTES=10`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotbookConfig {
    /// Base URL of the agent's schedule API, e.g. `https://api.example.com/agents/42`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Used when the preferences service is not reachable.
    #[serde(default)]
    pub preferences: BookingPreferences,
}

impl Default for SlotbookConfig {
    fn default() -> Self {
        SlotbookConfig {
            api_base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            preferences: BookingPreferences::default(),
        }
    }
}

/// `SLOTBOOK_` prefix, `__` between nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("SLOTBOOK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl SlotbookConfig {
    pub fn config_path() -> SlotbookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SlotbookError::Config("Could not determine config directory".into()))?
            .join("slotbook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if
    /// no config file exists yet.
    pub fn load() -> SlotbookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file, then apply `SLOTBOOK_*` environment overrides.
    pub fn load_from(path: &Path) -> SlotbookResult<Self> {
        Self::load_with_env(path, env_source())
    }

    fn load_with_env(path: &Path, env: Environment) -> SlotbookResult<Self> {
        let config: SlotbookConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| SlotbookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SlotbookError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded slotbook config");
        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SlotbookResult<()> {
        let contents = format!(
            "\
# slotbook configuration

# Schedule API for the agent:
# api_base_url = \"https://api.example.com/agents/42\"

# Request timeout in seconds:
# request_timeout_secs = {}

# Fallback booking preferences:
# [preferences]
# meeting_duration_minutes = 30
# buffer_time_minutes = 15
",
            DEFAULT_REQUEST_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SlotbookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SlotbookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
