/// Application settings
///
/// Read once at startup from `settings.toml` in the working directory, or
/// from the user config directory:
/// - Linux: ~/.config/allmove-tracker/settings.toml
/// - macOS: ~/Library/Application Support/allmove-tracker/settings.toml
/// - Windows: %APPDATA%\allmove-tracker\settings.toml
///
/// Any key left out takes its default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::signal::SignalEncoding;

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Default,
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Seconds between periodic auto-saves; 0 turns them off
    pub auto_save_interval: u64,
    pub theme: ThemeChoice,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            auto_save_interval: 600,
            theme: ThemeChoice::Default,
            window_width: 800,
            window_height: 600,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChallengeSettings {
    /// Keep a timestamped usage log
    pub log_enabled: bool,
    pub signal_encoding: SignalEncoding,
    /// Save right after each use when a save file is open
    pub auto_save_on_consume: bool,
    pub catalog_path: PathBuf,
    pub saves_dir: PathBuf,
    pub signal_path: PathBuf,
    pub game_version: String,
    pub challenge_type: String,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            log_enabled: true,
            signal_encoding: SignalEncoding::Decimal,
            auto_save_on_consume: true,
            catalog_path: PathBuf::from("pokemon_moves.csv"),
            saves_dir: PathBuf::from("saves"),
            signal_path: PathBuf::from("lua_interface/command.txt"),
            game_version: "Platinum".to_string(),
            challenge_type: "Single Use".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub challenge: ChallengeSettings,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TrackerError::Settings(e.to_string()))
    }

    /// Read settings from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| TrackerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings for this run: first file found wins, unreadable files fall
    /// back to the defaults with a warning
    pub fn load() -> Self {
        let Some(path) = Self::candidate_paths().into_iter().find(|p| p.exists()) else {
            info!("No {} found, using defaults", SETTINGS_FILE);
            return Self::default();
        };

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", path.display(), e);
            Self::default()
        })
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(mut dir) = dirs::config_dir() {
            dir.push("allmove-tracker");
            dir.push(SETTINGS_FILE);
            paths.push(dir);
        }
        paths
    }

    /// Periodic auto-save cadence, if enabled
    pub fn auto_save_every(&self) -> Option<Duration> {
        (self.general.auto_save_interval > 0).then(|| Duration::from_secs(self.general.auto_save_interval))
    }
}
