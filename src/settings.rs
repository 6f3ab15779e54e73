//! Player preferences
//!
//! Stored as a JSON file next to the score board. A missing or broken file
//! is never fatal: the game falls back to defaults and says so in the log.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NameError, SettingsError};

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 24;

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name scores are submitted under; empty until the player picks one
    pub player_name: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Shake the playfield when the player is hit
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    /// Local score board file
    pub leaderboard_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),

            // Audio
            master_volume: 0.8,
            music_volume: 0.7,
            muted: false,

            // Visual effects
            screen_shake: true,

            // Accessibility
            reduced_motion: false,

            leaderboard_path: PathBuf::from("save_punch_scores.json"),
        }
    }
}

impl Settings {
    /// Read settings from `path`
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Validate and store a new player name
    pub fn set_player_name(&mut self, name: &str) -> Result<(), SettingsError> {
        self.player_name = validate_player_name(name)?;
        Ok(())
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Scale a raw shake magnitude by the user's preference
    pub fn shake_magnitude(&self, raw: f32) -> f32 {
        if self.effective_screen_shake() { raw } else { 0.0 }
    }

    /// Music output gain after master volume and mute
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.music_volume.clamp(0.0, 1.0)
        }
    }
}

/// Trim a candidate player name and check it is usable
pub fn validate_player_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_trimmed() {
        assert_eq!(validate_player_name("  Mia  ").unwrap(), "Mia");
        assert_eq!(validate_player_name("   "), Err(NameError::Empty));
        assert_eq!(
            validate_player_name(&"x".repeat(25)),
            Err(NameError::TooLong { len: 25, max: 24 })
        );
        // Counted in characters, not bytes
        assert!(validate_player_name(&"é".repeat(24)).is_ok());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.set_player_name(" Kai ").unwrap();
        settings.muted = true;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.player_name, "Kai");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "reduced_motion": true }"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.reduced_motion);
        assert_eq!(loaded.master_volume, Settings::default().master_volume);
        assert!(!loaded.effective_screen_shake());
        assert_eq!(loaded.shake_magnitude(8.0), 0.0);
    }

    #[test]
    fn test_bad_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Settings::load(&missing), Err(SettingsError::Io { .. })));
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(Settings::load(&broken), Err(SettingsError::Format { .. })));
        assert_eq!(Settings::load_or_default(&broken), Settings::default());
    }

    #[test]
    fn test_music_gain() {
        let mut settings = Settings::default();
        assert!((settings.music_gain() - 0.56).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.music_gain(), 0.0);
    }
}
