use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::TemperatureUnit, provider::mock::MockOptions, store::StoreOptions};

/// Settings for the mock weather generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub search_latency_ms: u64,
    pub location_latency_ms: u64,
    /// Fraction of lookups that fail, `0.0..=1.0`.
    pub failure_rate: f64,
    pub seed: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        let defaults = MockOptions::default();
        Self {
            search_latency_ms: defaults.search_latency.as_millis() as u64,
            location_latency_ms: defaults.location_latency.as_millis() as u64,
            failure_rate: defaults.failure_rate,
            seed: defaults.seed,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_unit = "F"
/// request_timeout_secs = 10
///
/// [mock]
/// search_latency_ms = 1000
/// failure_rate = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_unit: TemperatureUnit,
    pub request_timeout_secs: u64,
    /// Where favorites and recent searches live; platform data dir if unset.
    pub data_dir: Option<PathBuf>,
    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_unit: TemperatureUnit::Celsius,
            request_timeout_secs: StoreOptions::default().request_timeout.as_secs(),
            data_dir: None,
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            initial_unit: self.default_unit,
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub fn mock_options(&self) -> MockOptions {
        MockOptions {
            search_latency: Duration::from_millis(self.mock.search_latency_ms),
            location_latency: Duration::from_millis(self.mock.location_latency_ms),
            failure_rate: self.mock.failure_rate.clamp(0.0, 1.0),
            seed: self.mock.seed,
        }
    }

    /// Check ranges a hand-edited file might get wrong.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mock.failure_rate) {
            return Err(anyhow!(
                "mock.failure_rate must be between 0.0 and 1.0, got {}",
                self.mock.failure_rate
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
