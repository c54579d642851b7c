use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::Lang,
    transport::{ClientConfig, DEFAULT_USER_AGENT},
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_lang = "en"
/// descriptions = true
/// timeout_secs = 20
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Language used when a command does not pass one, "is" or "en".
    pub default_lang: Option<String>,

    /// Attach measurement descriptions to forecasts and observations by default.
    pub descriptions: bool,

    /// Request timeout in seconds; unset means no timeout.
    pub timeout_secs: Option<u64>,

    /// Overrides the browser-like User-Agent header.
    pub user_agent: Option<String>,
}

impl Config {
    /// The configured default language, validated.
    pub fn default_lang(&self) -> Result<Lang> {
        Lang::resolve(self.default_lang.as_deref()).with_context(|| {
            format!(
                "Invalid default_lang in {}.\n\
                 Hint: run `vedur configure` or set it to \"is\" or \"en\".",
                Self::config_file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config file".to_string())
            )
        })
    }

    pub fn set_default_lang(&mut self, lang: Lang) {
        self.default_lang = Some(lang.as_str().to_string());
    }

    /// Transport settings derived from this config.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            user_agent: self.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

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
        let dirs = ProjectDirs::from("is", "vedur", "vedur-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
