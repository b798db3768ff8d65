use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::source::bmkg::{DEFAULT_AREA, DEFAULT_ENDPOINT};

/// Dashboard settings stored on disk and overridable from the command line.
///
/// Defaults: three regions of Lampung province, refreshed every sixty
/// seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// BMKG administrative area (adm1) code to poll.
    pub area: String,

    /// Forecast endpoint; only worth changing when pointing at a test server.
    pub endpoint: String,

    /// Number of regions shown at once.
    pub sample_size: usize,

    /// Seconds between data refreshes.
    pub refresh_secs: u64,

    /// Prefer the English condition description over the localized one.
    pub english_descriptions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sample_size: 3,
            refresh_secs: 60,
            english_descriptions: false,
        }
    }
}

impl Config {
    /// Cadence of the clock/countdown tick.
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    /// Value the countdown starts from and wraps back to.
    pub fn countdown_start(&self) -> u32 {
        self.refresh_secs.clamp(1, u64::from(u32::MAX)) as u32
    }

    /// Load config from disk, or return the defaults if no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, run with the reference defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherboard", "weatherboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
