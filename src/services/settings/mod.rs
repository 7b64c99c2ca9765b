// Settings service
// Loads and saves client configuration as TOML in the platform config dir

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

const CONFIG_FILE: &str = "config.toml";

pub struct SettingsService {
    config_path: PathBuf,
}

impl SettingsService {
    /// Service rooted at the platform config directory.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "aura", "aura-timeline")
            .ok_or_else(|| anyhow!("Could not determine a config directory"))?;
        Ok(Self::with_dir(dirs.config_dir()))
    }

    /// Service rooted at an explicit directory.
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            config_path: dir.join(CONFIG_FILE),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable. An invalid file is reported but never fatal.
    pub fn load_or_default(&self) -> Settings {
        let settings = match self.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(err) => {
                log::warn!(
                    "Failed to load settings from {}: {}; using defaults",
                    self.config_path.display(),
                    err
                );
                Settings::default()
            }
        };

        if let Err(err) = settings.validate() {
            log::warn!("Invalid settings ({}); using defaults", err);
            return Settings::default();
        }

        settings
    }

    fn load(&self) -> Result<Option<Settings>> {
        if !self.config_path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
        let settings = toml::from_str(&raw).context("Failed to parse settings file")?;
        Ok(Some(settings))
    }

    /// Persist settings
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.config_path, raw)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        Ok(())
    }
}
