//! Player settings persisted between sessions.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file, relative to the working directory.
pub const SETTINGS_PATH: &str = "settings.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music and UI volume, 0.0 to 1.0
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { music_volume: 1.0 }
    }
}

impl Settings {
    /// Read settings from disk. A missing file yields `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, SettingsError> {
        let label = path.display().to_string();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SettingsError::Io { path: label, source }),
        };
        let mut settings: Self =
            ron::from_str(&contents).map_err(|source| SettingsError::Parse { path: label, source })?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(Some(settings))
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        fs::write(path, contents).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Set the volume, clamped to [0, 1]. Returns true if it changed.
    pub fn set_music_volume(&mut self, volume: f32) -> bool {
        let volume = volume.clamp(0.0, 1.0);
        if (volume - self.music_volume).abs() < f32::EPSILON {
            return false;
        }
        self.music_volume = volume;
        true
    }

    /// Nudge the volume by `step`. Returns true if it changed.
    pub fn adjust_music_volume(&mut self, step: f32) -> bool {
        self.set_music_volume(self.music_volume + step)
    }
}

/// Where settings are read from and written to.
#[derive(Resource, Debug, Clone)]
pub struct SettingsPath(pub PathBuf);

impl Default for SettingsPath {
    fn default() -> Self {
        Self(PathBuf::from(SETTINGS_PATH))
    }
}

/// System to load settings at startup, falling back to defaults.
pub fn load_settings(mut commands: Commands, path: Res<SettingsPath>) {
    let settings = match Settings::load(&path.0) {
        Ok(Some(settings)) => {
            info!("Loaded settings from {}", path.0.display());
            settings
        }
        Ok(None) => {
            info!("No settings file, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("{}. Using default settings.", e);
            Settings::default()
        }
    };
    commands.insert_resource(settings);
}

/// Write settings back whenever they change.
pub fn save_settings_on_change(settings: Option<Res<Settings>>, path: Res<SettingsPath>) {
    let Some(settings) = settings else {
        return;
    };
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    match settings.save(&path.0) {
        Ok(()) => debug!("Saved settings to {}", path.0.display()),
        Err(e) => error!("{}", e),
    }
}
