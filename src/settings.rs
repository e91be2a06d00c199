//! Generation settings persisted between runs.
//!
//! Settings live in a small JSON file. Fields missing from the file are
//! filled in from the defaults so older files keep loading after new
//! settings are added.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: 4096,
            system_prompt: String::new(),
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            bail!(
                "Temperature must be between {} and {}, got {}",
                MIN_TEMPERATURE,
                MAX_TEMPERATURE,
                self.temperature
            );
        }
        if self.max_tokens == 0 {
            bail!("Max tokens must be at least 1");
        }
        Ok(())
    }
}

/// Default location of the settings file, `<config dir>/agentchat/settings.json`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agentchat")
        .join("settings.json")
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to the defaults when the file is
    /// missing or unreadable.
    pub fn load(&self) -> GenerationSettings {
        if !self.path.exists() {
            return GenerationSettings::default();
        }

        match fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<GenerationSettings>(&content)?))
        {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {}: {:?}", self.path.display(), settings);
                settings
            }
            Err(e) => {
                tracing::error!(
                    "Failed to parse settings from {}: {}",
                    self.path.display(),
                    e
                );
                GenerationSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &GenerationSettings) -> Result<()> {
        settings.validate()?;
        let content = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        tracing::info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
